// crates/topology-rs/src/address.rs

use crate::error::TopologyError;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// One `(type, name)` segment of a resource address, e.g. `profile=default`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PathElement {
    pub key: String,
    pub value: String,
}

impl PathElement {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Writes `key=value`, escaping `/`, `=` and `\` with a backslash so the
/// text form parses back to the same segment.
impl fmt::Display for PathElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_escaped(f, &self.key)?;
        f.write_str("=")?;
        write_escaped(f, &self.value)
    }
}

fn write_escaped(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    for c in text.chars() {
        if matches!(c, '/' | '=' | '\\') {
            f.write_str("\\")?;
        }
        write!(f, "{}", c)?;
    }
    Ok(())
}

/// Ordered path of typed, named segments identifying a node in the resource tree.
///
/// Addresses are values: `append` and `prefixed_with` return new addresses and
/// never modify the receiver, so an address handed to an operation stays fixed.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceAddress {
    elements: Vec<PathElement>,
}

impl ResourceAddress {
    /// The empty address of the root resource.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_elements(elements: Vec<PathElement>) -> Self {
        Self { elements }
    }

    /// Returns a copy of this address extended by one segment.
    pub fn append(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut elements = self.elements.clone();
        elements.push(PathElement::new(key, value));
        Self { elements }
    }

    /// Returns `parent` followed by every segment of this address.
    ///
    /// Used to re-parent relative addresses produced by nested grammars onto the
    /// address of the resource that owns them.
    pub fn prefixed_with(&self, parent: &ResourceAddress) -> Self {
        let mut elements = Vec::with_capacity(parent.len() + self.len());
        elements.extend(parent.elements.iter().cloned());
        elements.extend(self.elements.iter().cloned());
        Self { elements }
    }

    /// The address of the parent resource, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        if self.elements.is_empty() {
            return None;
        }
        Some(Self {
            elements: self.elements[..self.elements.len() - 1].to_vec(),
        })
    }

    pub fn last(&self) -> Option<&PathElement> {
        self.elements.last()
    }

    pub fn starts_with(&self, prefix: &ResourceAddress) -> bool {
        self.elements.starts_with(&prefix.elements)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathElement> {
        self.elements.iter()
    }

    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }
}

impl fmt::Display for ResourceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.elements.is_empty() {
            return write!(f, "/");
        }
        for element in &self.elements {
            write!(f, "/{}", element)?;
        }
        Ok(())
    }
}

/// Parses the display form, e.g. `/profile=default/subsystem=web`.
///
/// A backslash takes the next character literally, so `/path=a\/b` names a
/// `path` called `a/b`.
impl FromStr for ResourceAddress {
    type Err = TopologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TopologyError::InvalidAddress(s.to_string());
        let trimmed = s.strip_prefix('/').unwrap_or(s);
        if trimmed.is_empty() {
            return Ok(Self::root());
        }

        let mut elements = Vec::new();
        let mut key: Option<String> = None;
        let mut current = String::new();
        let mut chars = trimmed.chars();
        while let Some(c) = chars.next() {
            match c {
                '\\' => current.push(chars.next().ok_or_else(invalid)?),
                '=' if key.is_none() => key = Some(std::mem::take(&mut current)),
                '/' => {
                    elements.push(segment(key.take(), std::mem::take(&mut current)).ok_or_else(invalid)?);
                }
                '=' => return Err(invalid()),
                _ => current.push(c),
            }
        }
        elements.push(segment(key, current).ok_or_else(invalid)?);
        Ok(Self { elements })
    }
}

fn segment(key: Option<String>, value: String) -> Option<PathElement> {
    match key {
        Some(key) if !key.is_empty() && !value.is_empty() => Some(PathElement::new(key, value)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_leaves_parent_untouched() {
        let profile = ResourceAddress::root().append("profile", "default");
        let subsystem = profile.append("subsystem", "web");

        assert_eq!(profile.len(), 1);
        assert_eq!(subsystem.len(), 2);
        assert_eq!(subsystem.parent(), Some(profile.clone()));
        assert!(subsystem.starts_with(&profile));
        assert_eq!(subsystem.last(), Some(&PathElement::new("subsystem", "web")));
    }

    #[test]
    fn test_prefixed_with_reparents() {
        let relative = ResourceAddress::root()
            .append("subsystem", "web")
            .append("connector", "http");
        let profile = ResourceAddress::root().append("profile", "full");

        let absolute = relative.prefixed_with(&profile);
        assert_eq!(
            absolute.to_string(),
            "/profile=full/subsystem=web/connector=http"
        );
        assert_eq!(relative.len(), 2);
    }

    #[test]
    fn test_display_and_parse() {
        assert_eq!(ResourceAddress::root().to_string(), "/");
        assert_eq!("/".parse::<ResourceAddress>().unwrap(), ResourceAddress::root());

        let addr: ResourceAddress = "/server-group=main/jvm=default".parse().unwrap();
        assert_eq!(
            addr,
            ResourceAddress::root()
                .append("server-group", "main")
                .append("jvm", "default")
        );
        assert_eq!(addr.parent().unwrap().parent(), Some(ResourceAddress::root()));
        assert_eq!(ResourceAddress::root().parent(), None);
    }

    #[test]
    fn test_parse_rejects_malformed_segments() {
        assert!(matches!(
            "/profile".parse::<ResourceAddress>(),
            Err(TopologyError::InvalidAddress(_))
        ));
        assert!(matches!(
            "/profile=default/=web".parse::<ResourceAddress>(),
            Err(TopologyError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_separators_in_names_round_trip() {
        let addr = ResourceAddress::root()
            .append("deployment", "apps/web=1.war")
            .append("path", "C:\\temp");
        let text = addr.to_string();
        assert_eq!(text, "/deployment=apps\\/web\\=1.war/path=C:\\\\temp");
        assert_eq!(text.parse::<ResourceAddress>().unwrap(), addr);

        // An unescaped separator inside a name is still rejected.
        assert!(matches!(
            "/deployment=a=b".parse::<ResourceAddress>(),
            Err(TopologyError::InvalidAddress(_))
        ));
        assert!(matches!(
            "/deployment=a\\".parse::<ResourceAddress>(),
            Err(TopologyError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_structural_equality_and_hash() {
        use std::collections::HashSet;

        let a = ResourceAddress::root().append("interface", "public");
        let b: ResourceAddress = "/interface=public".parse().unwrap();
        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }
}
