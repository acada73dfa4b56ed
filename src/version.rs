/// Suffix `git describe --dirty` appends when the working tree has
/// uncommitted changes to tracked files.
pub const DIRTY_SUFFIX: &str = "-dirty";

/// Sentinel recorded in place of a descriptive string when the describe
/// query fails (not a repository, no commits, no tags).
pub const NO_GIT_REPOS: &str = "NO_GIT_REPOS";

/// Placeholder for version fields the descriptive string does not supply.
const UNKNOWN: &str = "99999";

/// Numeric prefix of a descriptive string, each field independently optional.
/// Matched digit runs are kept verbatim so leading zeros survive.
#[derive(Debug, Clone, PartialEq)]
pub struct TagPrefix {
    pub major: Option<String>,
    pub minor: Option<String>,
    pub distance: Option<String>,
}

/// Extracts the leading `MAJOR[.MINOR[-DISTANCE]]` digits from a descriptive
/// string such as `1.2-3-g1a2b3c4-dirty`. Scanning stops at the first
/// character that breaks the shape; whatever tail remains (abbreviated hash,
/// dirty marker) is ignored.
pub fn parse_tag_prefix(rev: &str) -> TagPrefix {
    let mut prefix = TagPrefix {
        major: None,
        minor: None,
        distance: None,
    };

    let Some((major, rest)) = leading_digits(rev) else {
        return prefix;
    };
    prefix.major = Some(major.to_string());

    let Some(rest) = rest.strip_prefix('.') else {
        return prefix;
    };
    let Some((minor, rest)) = leading_digits(rest) else {
        return prefix;
    };
    prefix.minor = Some(minor.to_string());

    let Some(rest) = rest.strip_prefix('-') else {
        return prefix;
    };
    let Some((distance, _)) = leading_digits(rest) else {
        return prefix;
    };
    prefix.distance = Some(distance.to_string());

    prefix
}

fn leading_digits(s: &str) -> Option<(&str, &str)> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    if end == 0 {
        None
    } else {
        Some((&s[..end], &s[end..]))
    }
}

pub fn is_dirty(rev: &str) -> bool {
    rev.ends_with(DIRTY_SUFFIX)
}

/// The derived version strings, one per output symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionSet {
    pub version1: String,
    pub version2: String,
    pub version3: String,
    pub version4: String,
    pub major: String,
    pub minor: String,
    pub patch: String,
}

/// Pure formatting step: turns a descriptive string plus run context into
/// the full version set. On a dirty tree the user name and local build
/// counter are appended to `version4` and `patch`; on a clean tree
/// `version4` ends in `.0` and the counter is unused.
pub fn derive(rev: &str, dirty: bool, user: &str, localcnt: u64) -> VersionSet {
    let tag = parse_tag_prefix(rev);

    let version1 = tag.major.unwrap_or_else(|| UNKNOWN.to_string());
    let major = version1.clone();

    let (version2, minor) = match tag.minor {
        Some(mi) => (format!("{}.{}", major, mi), mi),
        None => (format!("{}.{}", version1, UNKNOWN), UNKNOWN.to_string()),
    };

    let (version3, mut patch) = match tag.distance {
        Some(d) => (format!("{}.{}", version2, d), d),
        None => (format!("{}.{}", version2, UNKNOWN), UNKNOWN.to_string()),
    };

    let version4 = if dirty {
        patch = format!("{}.{}{}", patch, user, localcnt);
        format!("{}.{}{}", version3, user, localcnt)
    } else {
        format!("{}.0", version3)
    };

    VersionSet {
        version1,
        version2,
        version3,
        version4,
        major,
        minor,
        patch,
    }
}
