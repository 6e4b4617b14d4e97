// crates/topology-rs-xml/src/parser/interfaces.rs

use super::{first_occurrence, require_no_attributes, unexpected_element, AttributeValues, DomainParser};
use crate::builder::emit;
use crate::element::{Attribute, Criterion, Element};
use crate::error::DomainXmlError;
use crate::stream::StartElement;
use topology_rs::{ModelValue, Operation, ResourceAddress};

impl<'a, 'r> DomainParser<'a, 'r> {
    pub(super) fn parse_interfaces(
        &mut self,
        section: &StartElement,
        ops: &mut Vec<Operation>,
    ) -> Result<(), DomainXmlError> {
        require_no_attributes(section)?;
        while let Some(element) = self.next_domain_child()? {
            if Element::from_local_name(element.name()) != Element::Interface {
                return Err(unexpected_element(&element));
            }
            let attrs = AttributeValues::read(&element, &[Attribute::Name])?;
            let name = attrs.required(Attribute::Name)?;
            self.names.interfaces.declare(name, element.location)?;

            let mut op = Operation::add(ResourceAddress::root().append("interface", name));
            let mut seen = Vec::new();
            while let Some(child) = self.next_domain_child()? {
                let kind = first_occurrence(&mut seen, &child)?;
                let value = match kind.criterion() {
                    Some(Criterion::Flag) => {
                        require_no_attributes(&child)?;
                        ModelValue::Boolean(true)
                    }
                    Some(Criterion::Valued(attribute)) => {
                        let criterion_attrs = AttributeValues::read(&child, &[attribute])?;
                        ModelValue::from(criterion_attrs.required(attribute)?)
                    }
                    None => return Err(unexpected_element(&child)),
                };
                self.reader.require_no_content()?;
                op.set_parameter(kind.local_name(), value);
            }
            emit(ops, op);
        }
        Ok(())
    }
}
