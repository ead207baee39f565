//! Reader for GVRP instance files.
//!
//! The format is a TSPLIB-like header followed by three sections:
//!
//! ```text
//! NAME : 3-A-n6-k2
//! COMMENT : GVRP
//! DIMENSION : 6
//! VEHICLES : 2
//! GVRP_SETS : 3
//! CAPACITY : 10
//! EDGE_WEIGHT_TYPE : EUC_2D
//! NODE_COORD_SECTION
//! 1 0 0
//! 2 10 0
//! ...
//! GVRP_SET_SECTION
//! 1 2 3 -1
//! ...
//! DEMAND_SECTION
//! 1 4
//! ...
//! EOF
//! ```
//!
//! Node ids are 1-based. The node listed in no set is the depot and becomes
//! customer 0; the other nodes are numbered `1..` in node id order, so with
//! the usual depot at node 1 node `i` becomes customer `i - 1`. Set `s`
//! becomes `ClusterId(s - 1)`.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::models::{Cluster, ClusterId, Customer, Instance, InstanceError, DEFAULT_CANDIDATE_SIZE};

/// Result type of the reader.
pub type Result<T> = std::result::Result<T, ReadError>;

/// Failure to read a GVRP instance.
#[derive(Debug)]
pub enum ReadError {
    /// The underlying reader failed.
    Io(std::io::Error),
    /// A required header key is absent.
    MissingKey(&'static str),
    /// A header value or data token cannot be parsed.
    InvalidValue { line: usize, token: String },
    /// A header value that must be positive is not.
    NotPositive { key: &'static str, value: i64 },
    /// Only `EUC_2D` distances are supported.
    UnsupportedEdgeWeight(String),
    /// A line does not fit the section it appears in.
    UnexpectedLine { line: usize, content: String },
    /// A set list ends without its `-1` terminator.
    UnterminatedSet { set: i64 },
    /// `DIMENSION` disagrees with the coordinates listed.
    NodeCount { expected: usize, actual: usize },
    /// `GVRP_SETS` disagrees with the sets listed.
    SetCount { expected: usize, actual: usize },
    /// A set id outside `1..=GVRP_SETS`.
    UnknownSet { set: i64 },
    /// A set lists a node without coordinates.
    UnknownNode { set: i64, node: i64 },
    /// A node appears in more than one set.
    DuplicateMember { node: i64 },
    /// A set has no demand line.
    MissingDemand { set: i64 },
    /// Every node belongs to a set.
    NoDepot,
    /// A node other than the depot belongs to no set.
    UnassignedNode { node: i64 },
    /// The data parsed but does not form a valid instance.
    Instance(InstanceError),
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadError::Io(e) => write!(f, "cannot read instance: {}", e),
            ReadError::MissingKey(key) => write!(f, "missing header key {}", key),
            ReadError::InvalidValue { line, token } => {
                write!(f, "line {}: cannot parse '{}'", line, token)
            }
            ReadError::NotPositive { key, value } => {
                write!(f, "{} must be positive, got {}", key, value)
            }
            ReadError::UnsupportedEdgeWeight(kind) => {
                write!(f, "expecting 'EUC_2D' as EDGE_WEIGHT_TYPE, got '{}'", kind)
            }
            ReadError::UnexpectedLine { line, content } => {
                write!(f, "line {}: unexpected '{}'", line, content)
            }
            ReadError::UnterminatedSet { set } => write!(f, "set {} is not terminated by -1", set),
            ReadError::NodeCount { expected, actual } => {
                write!(f, "DIMENSION is {} but {} nodes are listed", expected, actual)
            }
            ReadError::SetCount { expected, actual } => {
                write!(f, "GVRP_SETS is {} but {} sets are listed", expected, actual)
            }
            ReadError::UnknownSet { set } => write!(f, "unknown set {}", set),
            ReadError::UnknownNode { set, node } => {
                write!(f, "set {} lists node {} which has no coordinates", set, node)
            }
            ReadError::DuplicateMember { node } => write!(f, "node {} is in several sets", node),
            ReadError::MissingDemand { set } => write!(f, "set {} has no demand", set),
            ReadError::NoDepot => write!(f, "every node belongs to a set, no depot left"),
            ReadError::UnassignedNode { node } => write!(f, "node {} belongs to no set", node),
            ReadError::Instance(e) => write!(f, "invalid instance: {}", e),
        }
    }
}

impl std::error::Error for ReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReadError::Io(e) => Some(e),
            ReadError::Instance(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ReadError {
    fn from(e: std::io::Error) -> Self {
        ReadError::Io(e)
    }
}

impl From<InstanceError> for ReadError {
    fn from(e: InstanceError) -> Self {
        ReadError::Instance(e)
    }
}

/// A source of a GVRP instance.
pub trait GvrpInstance {
    /// Reads the instance, building candidate lists of size `candidate_size`.
    fn read_gvrp(self, candidate_size: usize) -> Result<Instance>;
}

impl<R: Read> GvrpInstance for BufReader<R> {
    fn read_gvrp(self, candidate_size: usize) -> Result<Instance> {
        let mut reader = GvrpReader::default();
        for (index, line) in self.lines().enumerate() {
            if !reader.feed(index + 1, &line?)? {
                break;
            }
        }
        reader.finish(candidate_size)
    }
}

impl GvrpInstance for &str {
    fn read_gvrp(self, candidate_size: usize) -> Result<Instance> {
        let mut reader = GvrpReader::default();
        for (index, line) in self.lines().enumerate() {
            if !reader.feed(index + 1, line)? {
                break;
            }
        }
        reader.finish(candidate_size)
    }
}

/// Parses an instance from text with the default candidate list size.
///
/// # Examples
///
/// ```
/// use u_gvrp::io::parse_instance;
///
/// let text = "\
/// NAME : tiny
/// COMMENT : GVRP
/// DIMENSION : 4
/// VEHICLES : 1
/// GVRP_SETS : 2
/// CAPACITY : 5
/// EDGE_WEIGHT_TYPE : EUC_2D
/// NODE_COORD_SECTION
/// 1 0 0
/// 2 3 4
/// 3 6 8
/// 4 0 5
/// GVRP_SET_SECTION
/// 1 2 3 -1
/// 2 4 -1
/// DEMAND_SECTION
/// 1 2
/// 2 3
/// EOF
/// ";
/// let instance = parse_instance(text).unwrap();
/// assert_eq!(instance.name(), "tiny");
/// assert_eq!(instance.num_customers(), 3);
/// assert_eq!(instance.num_clusters(), 2);
/// assert_eq!(instance.distance(0, 1), 5);
/// ```
pub fn parse_instance(text: &str) -> Result<Instance> {
    text.read_gvrp(DEFAULT_CANDIDATE_SIZE)
}

/// Reads an instance file with the default candidate list size.
pub fn read_instance_file(path: impl AsRef<Path>) -> Result<Instance> {
    let file = File::open(path.as_ref())?;
    log::debug!("reading GVRP instance {}", path.as_ref().display());
    BufReader::new(file).read_gvrp(DEFAULT_CANDIDATE_SIZE)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Section {
    #[default]
    Header,
    Coords,
    Sets,
    Demands,
}

#[derive(Debug, Default)]
struct GvrpReader {
    section: Section,
    name: Option<String>,
    dimension: Option<i64>,
    vehicles: Option<i64>,
    sets: Option<i64>,
    capacity: Option<i64>,
    coords: BTreeMap<i64, (i32, i32)>,
    members: BTreeMap<i64, Vec<i64>>,
    demands: HashMap<i64, i32>,
    open_set: Option<(i64, Vec<i64>)>,
}

impl GvrpReader {
    /// Consumes one line. Returns `false` once `EOF` is reached.
    fn feed(&mut self, line_no: usize, raw: &str) -> Result<bool> {
        let line = raw.trim();
        if line.is_empty() {
            return Ok(true);
        }
        let next = match line {
            "EOF" => None,
            "NODE_COORD_SECTION" => Some(Section::Coords),
            "GVRP_SET_SECTION" => Some(Section::Sets),
            "DEMAND_SECTION" => Some(Section::Demands),
            _ => {
                self.feed_data(line_no, line)?;
                return Ok(true);
            }
        };
        if let Some((set, _)) = self.open_set {
            return Err(ReadError::UnterminatedSet { set });
        }
        match next {
            Some(section) => {
                self.section = section;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn feed_data(&mut self, line_no: usize, line: &str) -> Result<()> {
        match self.section {
            Section::Header => self.feed_header(line_no, line),
            Section::Coords => {
                let tokens: Vec<&str> = line.split_whitespace().collect();
                if tokens.len() != 3 {
                    return Err(unexpected(line_no, line));
                }
                let id = parse_int(line_no, tokens[0])?;
                let x = parse_coord(line_no, tokens[1])?;
                let y = parse_coord(line_no, tokens[2])?;
                self.coords.insert(id, (x, y));
                Ok(())
            }
            Section::Sets => {
                let mut tokens = line.split_whitespace();
                let (set, mut nodes) = match self.open_set.take() {
                    Some(open) => open,
                    None => match tokens.next() {
                        Some(t) => (parse_int(line_no, t)?, Vec::new()),
                        None => return Err(unexpected(line_no, line)),
                    },
                };
                for t in tokens {
                    let node = parse_int(line_no, t)?;
                    if node == -1 {
                        self.members.insert(set, nodes);
                        return Ok(());
                    }
                    nodes.push(node);
                }
                // The list continues on the next line.
                self.open_set = Some((set, nodes));
                Ok(())
            }
            Section::Demands => {
                let tokens: Vec<&str> = line.split_whitespace().collect();
                if tokens.len() != 2 {
                    return Err(unexpected(line_no, line));
                }
                let set = parse_int(line_no, tokens[0])?;
                let demand = parse_int(line_no, tokens[1])?;
                let demand = i32::try_from(demand).map_err(|_| invalid(line_no, tokens[1]))?;
                self.demands.insert(set, demand);
                Ok(())
            }
        }
    }

    fn feed_header(&mut self, line_no: usize, line: &str) -> Result<()> {
        let Some((key, value)) = line.split_once(':') else {
            return Err(unexpected(line_no, line));
        };
        let value = value.trim();
        match key.trim() {
            "NAME" => self.name = Some(value.to_string()),
            "DIMENSION" => self.dimension = Some(parse_int(line_no, value)?),
            "VEHICLES" => self.vehicles = Some(parse_int(line_no, value)?),
            "GVRP_SETS" => self.sets = Some(parse_int(line_no, value)?),
            "CAPACITY" => self.capacity = Some(parse_int(line_no, value)?),
            "EDGE_WEIGHT_TYPE" => {
                if value != "EUC_2D" {
                    return Err(ReadError::UnsupportedEdgeWeight(value.to_string()));
                }
            }
            other => log::debug!("line {}: ignoring header key {}", line_no, other),
        }
        Ok(())
    }

    fn finish(self, candidate_size: usize) -> Result<Instance> {
        if let Some((set, _)) = self.open_set {
            return Err(ReadError::UnterminatedSet { set });
        }
        let dimension = positive("DIMENSION", self.dimension)?;
        let vehicles = positive("VEHICLES", self.vehicles)?;
        let num_sets = positive("GVRP_SETS", self.sets)?;
        let capacity = positive("CAPACITY", self.capacity)?;
        let capacity = i32::try_from(capacity).map_err(|_| ReadError::NotPositive {
            key: "CAPACITY",
            value: capacity as i64,
        })?;

        if self.coords.len() != dimension {
            return Err(ReadError::NodeCount {
                expected: dimension,
                actual: self.coords.len(),
            });
        }
        if self.members.len() != num_sets {
            return Err(ReadError::SetCount {
                expected: num_sets,
                actual: self.members.len(),
            });
        }

        let mut set_of: HashMap<i64, i64> = HashMap::new();
        for (&set, nodes) in &self.members {
            if set < 1 || set > num_sets as i64 {
                return Err(ReadError::UnknownSet { set });
            }
            for &node in nodes {
                if !self.coords.contains_key(&node) {
                    return Err(ReadError::UnknownNode { set, node });
                }
                if set_of.insert(node, set).is_some() {
                    return Err(ReadError::DuplicateMember { node });
                }
            }
        }
        if let Some(&set) = self.demands.keys().find(|&&s| !self.members.contains_key(&s)) {
            return Err(ReadError::UnknownSet { set });
        }

        let mut depot = None;
        for &node in self.coords.keys() {
            if !set_of.contains_key(&node) {
                match depot {
                    None => depot = Some(node),
                    Some(_) => return Err(ReadError::UnassignedNode { node }),
                }
            }
        }
        let depot = depot.ok_or(ReadError::NoDepot)?;

        // Depot first, then the other nodes in id order.
        let mut customer_of: HashMap<i64, usize> = HashMap::new();
        let (dx, dy) = self.coords[&depot];
        let mut customers = vec![Customer::depot(dx, dy)];
        customer_of.insert(depot, 0);
        for (&node, &(x, y)) in &self.coords {
            if node == depot {
                continue;
            }
            let id = customers.len();
            let cluster = ClusterId((set_of[&node] - 1) as usize);
            customers.push(Customer::new(id, x, y, cluster));
            customer_of.insert(node, id);
        }

        let mut clusters = Vec::with_capacity(num_sets);
        for (&set, nodes) in &self.members {
            let demand = *self
                .demands
                .get(&set)
                .ok_or(ReadError::MissingDemand { set })?;
            let members = nodes.iter().map(|n| customer_of[n]).collect();
            clusters.push(Cluster::new(ClusterId((set - 1) as usize), demand, members));
        }

        let name = self.name.unwrap_or_default();
        log::debug!(
            "parsed instance {}: {} customers, {} clusters, {} vehicles of capacity {}",
            name,
            customers.len() - 1,
            clusters.len(),
            vehicles,
            capacity
        );
        Ok(Instance::new(
            name,
            customers,
            clusters,
            vehicles,
            capacity,
            candidate_size,
        )?)
    }
}

fn positive(key: &'static str, value: Option<i64>) -> Result<usize> {
    let value = value.ok_or(ReadError::MissingKey(key))?;
    if value <= 0 {
        return Err(ReadError::NotPositive { key, value });
    }
    Ok(value as usize)
}

fn parse_int(line: usize, token: &str) -> Result<i64> {
    token.parse::<i64>().map_err(|_| invalid(line, token))
}

// Some instance files write coordinates as `28.00000`.
fn parse_coord(line: usize, token: &str) -> Result<i32> {
    token
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v.round() as i32)
        .ok_or_else(|| invalid(line, token))
}

fn invalid(line: usize, token: &str) -> ReadError {
    ReadError::InvalidValue {
        line,
        token: token.to_string(),
    }
}

fn unexpected(line: usize, content: &str) -> ReadError {
    ReadError::UnexpectedLine {
        line,
        content: content.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TINY: &str = "\
NAME : 3-A-tiny
COMMENT : GVRP
DIMENSION : 6
VEHICLES : 2
GVRP_SETS : 3
CAPACITY : 10
EDGE_WEIGHT_TYPE : EUC_2D
NODE_COORD_SECTION
1 0 0
2 10 0
3 20 0
4 0 10
5 0 20
6 -10 0
GVRP_SET_SECTION
1 2 3 -1
2 4 5 -1
3 6 -1
DEMAND_SECTION
1 4
2 3
3 5
EOF
";

    #[test]
    fn test_parse_tiny() {
        let inst = parse_instance(TINY).expect("valid");
        assert_eq!(inst.name(), "3-A-tiny");
        assert_eq!(inst.fleet(), 2);
        assert_eq!(inst.capacity(), 10);
        assert_eq!(inst.num_customers(), 5);
        assert_eq!(inst.num_clusters(), 3);
        assert_eq!(inst.cluster(ClusterId(0)).members(), &[1, 2]);
        assert_eq!(inst.cluster(ClusterId(2)).members(), &[5]);
        assert_eq!(inst.cluster(ClusterId(1)).demand(), 3);
        assert_eq!(inst.cluster_of(4), ClusterId(1));
        assert_eq!(inst.distance(0, 2), 20);
        assert_eq!(inst.total_demand(), 12);
    }

    #[test]
    fn test_compact_header_and_float_coords() {
        let text = TINY
            .replace("CAPACITY : 10", "CAPACITY: 10")
            .replace("2 10 0", "2 10.00000 0.0");
        let inst = parse_instance(&text).expect("valid");
        assert_eq!(inst.capacity(), 10);
        assert_eq!(inst.customer(1).x(), 10);
    }

    #[test]
    fn test_set_list_spanning_lines() {
        let text = TINY.replace("1 2 3 -1", "1 2\n3 -1");
        let inst = parse_instance(&text).expect("valid");
        assert_eq!(inst.cluster(ClusterId(0)).members(), &[1, 2]);
    }

    #[test]
    fn test_depot_not_first_node() {
        let text = TINY
            .replace("1 2 3 -1", "1 1 3 -1")
            .replace("1 0 0\n2 10 0", "1 10 0\n2 0 0");
        let inst = parse_instance(&text).expect("valid");
        assert_eq!((inst.depot().x(), inst.depot().y()), (0, 0));
        assert_eq!(inst.cluster(ClusterId(0)).members(), &[1, 2]);
        assert_eq!(inst.customer(1).x(), 10);
    }

    #[test]
    fn test_buf_reader_source() {
        let inst = BufReader::new(TINY.as_bytes()).read_gvrp(2).expect("valid");
        assert_eq!(inst.candidates().k(), 2);
    }

    #[test]
    fn test_rejects_other_edge_weights() {
        let text = TINY.replace("EUC_2D", "GEO");
        assert!(matches!(
            parse_instance(&text),
            Err(ReadError::UnsupportedEdgeWeight(kind)) if kind == "GEO"
        ));
    }

    #[test]
    fn test_missing_and_non_positive_keys() {
        let text = TINY.replace("VEHICLES : 2\n", "");
        assert!(matches!(
            parse_instance(&text),
            Err(ReadError::MissingKey("VEHICLES"))
        ));
        let text = TINY.replace("CAPACITY : 10", "CAPACITY : 0");
        assert!(matches!(
            parse_instance(&text),
            Err(ReadError::NotPositive {
                key: "CAPACITY",
                value: 0
            })
        ));
    }

    #[test]
    fn test_malformed_tokens() {
        let text = TINY.replace("DIMENSION : 6", "DIMENSION : six");
        assert!(matches!(
            parse_instance(&text),
            Err(ReadError::InvalidValue { line: 3, .. })
        ));
        let text = TINY.replace("4 0 10", "4 0");
        assert!(matches!(
            parse_instance(&text),
            Err(ReadError::UnexpectedLine { .. })
        ));
    }

    #[test]
    fn test_count_mismatches() {
        let text = TINY.replace("DIMENSION : 6", "DIMENSION : 7");
        assert!(matches!(
            parse_instance(&text),
            Err(ReadError::NodeCount {
                expected: 7,
                actual: 6
            })
        ));
        let text = TINY.replace("GVRP_SETS : 3", "GVRP_SETS : 4");
        assert!(matches!(
            parse_instance(&text),
            Err(ReadError::SetCount {
                expected: 4,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_bad_set_contents() {
        let text = TINY.replace("3 6 -1", "3 6");
        assert!(matches!(
            parse_instance(&text),
            Err(ReadError::UnterminatedSet { set: 3 })
        ));
        let text = TINY.replace("3 6 -1", "3 9 -1");
        assert!(matches!(
            parse_instance(&text),
            Err(ReadError::UnknownNode { set: 3, node: 9 })
        ));
        let text = TINY.replace("3 6 -1", "3 6 5 -1");
        assert!(matches!(
            parse_instance(&text),
            Err(ReadError::DuplicateMember { node: 5 })
        ));
        let text = TINY.replace("3 5\nEOF", "EOF");
        assert!(matches!(
            parse_instance(&text),
            Err(ReadError::MissingDemand { set: 3 })
        ));
    }

    #[test]
    fn test_depot_detection() {
        let text = TINY.replace("3 6 -1", "3 6 1 -1");
        assert!(matches!(parse_instance(&text), Err(ReadError::NoDepot)));
        let text = TINY.replace("2 4 5 -1", "2 4 -1");
        assert!(matches!(
            parse_instance(&text),
            Err(ReadError::UnassignedNode { node: 5 })
        ));
    }

    #[test]
    fn test_instance_errors_propagate() {
        let text = TINY.replace("3 5\nEOF", "3 11\nEOF");
        let err = parse_instance(&text).unwrap_err();
        assert!(matches!(
            err,
            ReadError::Instance(InstanceError::DemandExceedsCapacity { .. })
        ));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_missing_file() {
        let err = read_instance_file("/nonexistent/instance.gvrp").unwrap_err();
        assert!(matches!(err, ReadError::Io(_)));
    }
}
