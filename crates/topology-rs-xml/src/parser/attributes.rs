// crates/topology-rs-xml/src/parser/attributes.rs

use crate::element::Attribute;
use crate::error::DomainXmlError;
use crate::stream::{Location, StartElement};
use std::collections::BTreeMap;

/// The attributes of one element, checked against the set the element accepts.
#[derive(Debug)]
pub(crate) struct AttributeValues<'e> {
    values: BTreeMap<Attribute, &'e str>,
    location: Location,
}

impl<'e> AttributeValues<'e> {
    /// Collects the attributes of `element`.
    ///
    /// Fails on a prefixed attribute, on a name outside `allowed`, and on a
    /// name given twice.
    pub fn read(element: &'e StartElement, allowed: &[Attribute]) -> Result<Self, DomainXmlError> {
        let mut values = BTreeMap::new();
        for attr in &element.attributes {
            let attribute = Attribute::from_local_name(&attr.local_name);
            if attr.namespace.is_some() || attribute == Attribute::Unknown || !allowed.contains(&attribute) {
                return Err(DomainXmlError::UnexpectedAttribute {
                    name: attr.local_name.clone(),
                    location: element.location,
                });
            }
            if values.insert(attribute, attr.value.as_str()).is_some() {
                return Err(DomainXmlError::DuplicateAttribute {
                    name: attr.local_name.clone(),
                    location: element.location,
                });
            }
        }
        Ok(Self {
            values,
            location: element.location,
        })
    }

    /// Checks that every attribute in `required` is present, reporting all
    /// missing ones at once.
    pub fn require(&self, required: &[Attribute]) -> Result<(), DomainXmlError> {
        let missing: Vec<&'static str> = required
            .iter()
            .filter(|a| !self.values.contains_key(*a))
            .map(Attribute::local_name)
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(DomainXmlError::MissingRequiredAttribute {
                attributes: missing,
                location: self.location,
            })
        }
    }

    pub fn get(&self, attribute: Attribute) -> Option<&'e str> {
        self.values.get(&attribute).copied()
    }

    pub fn required(&self, attribute: Attribute) -> Result<&'e str, DomainXmlError> {
        self.get(attribute)
            .ok_or_else(|| DomainXmlError::MissingRequiredAttribute {
                attributes: vec![attribute.local_name()],
                location: self.location,
            })
    }

    /// Parses an optional `true`/`false` attribute, ignoring ASCII case.
    pub fn boolean(&self, attribute: Attribute) -> Result<Option<bool>, DomainXmlError> {
        self.get(attribute)
            .map(|value| {
                if value.eq_ignore_ascii_case("true") {
                    Ok(true)
                } else if value.eq_ignore_ascii_case("false") {
                    Ok(false)
                } else {
                    Err(self.invalid(attribute, value))
                }
            })
            .transpose()
    }

    pub fn int(&self, attribute: Attribute) -> Result<Option<i32>, DomainXmlError> {
        self.get(attribute)
            .map(|value| value.trim().parse::<i32>().map_err(|_| self.invalid(attribute, value)))
            .transpose()
    }

    /// Parses an optional TCP/UDP port number.
    pub fn port(&self, attribute: Attribute) -> Result<Option<i32>, DomainXmlError> {
        self.get(attribute)
            .map(|value| {
                value
                    .trim()
                    .parse::<u16>()
                    .map(i32::from)
                    .map_err(|_| self.invalid(attribute, value))
            })
            .transpose()
    }

    fn invalid(&self, attribute: Attribute, value: &str) -> DomainXmlError {
        DomainXmlError::InvalidAttributeValue {
            attribute: attribute.local_name(),
            value: value.to_string(),
            location: self.location,
        }
    }
}

/// Fails if `element` carries any attribute.
pub(crate) fn require_no_attributes(element: &StartElement) -> Result<(), DomainXmlError> {
    match element.attributes.first() {
        None => Ok(()),
        Some(attr) => Err(DomainXmlError::UnexpectedAttribute {
            name: attr.local_name.clone(),
            location: element.location,
        }),
    }
}
