// crates/topology-rs-xml/src/element.rs

//! The element and attribute vocabulary of the domain document.

macro_rules! vocabulary {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $local:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum $name {
            $($variant,)+
            /// Any name not in the vocabulary.
            Unknown,
        }

        impl $name {
            pub fn from_local_name(name: &str) -> Self {
                match name {
                    $($local => Self::$variant,)+
                    _ => Self::Unknown,
                }
            }

            pub fn local_name(&self) -> &'static str {
                match self {
                    $(Self::$variant => $local,)+
                    Self::Unknown => "unknown",
                }
            }
        }
    };
}

vocabulary!(
    /// Element names.
    Element {
        Domain => "domain",
        // Sections
        Extensions => "extensions",
        SystemProperties => "system-properties",
        Paths => "paths",
        Profiles => "profiles",
        Interfaces => "interfaces",
        SocketBindingGroups => "socket-binding-groups",
        Deployments => "deployments",
        ServerGroups => "server-groups",
        // Entities
        Extension => "extension",
        Property => "property",
        Path => "path",
        Profile => "profile",
        Include => "include",
        Subsystem => "subsystem",
        Interface => "interface",
        SocketBindingGroup => "socket-binding-group",
        SocketBinding => "socket-binding",
        OutboundSocketBinding => "outbound-socket-binding",
        RemoteDestination => "remote-destination",
        LocalDestination => "local-destination",
        Deployment => "deployment",
        Content => "content",
        FsArchive => "fs-archive",
        FsExploded => "fs-exploded",
        ServerGroup => "server-group",
        Jvm => "jvm",
        Heap => "heap",
        Permgen => "permgen",
        Stack => "stack",
        JvmOptions => "jvm-options",
        Option => "option",
        EnvironmentVariables => "environment-variables",
        Variable => "variable",
        // Interface criteria
        AnyAddress => "any-address",
        AnyIpv4Address => "any-ipv4-address",
        AnyIpv6Address => "any-ipv6-address",
        InetAddress => "inet-address",
        LinkLocalAddress => "link-local-address",
        Loopback => "loopback",
        LoopbackAddress => "loopback-address",
        Multicast => "multicast",
        Nic => "nic",
        NicMatch => "nic-match",
        PointToPoint => "point-to-point",
        PublicAddress => "public-address",
        SiteLocalAddress => "site-local-address",
        SubnetMatch => "subnet-match",
        Up => "up",
        Virtual => "virtual",
    }
);

vocabulary!(
    /// Attribute names.
    Attribute {
        BootTime => "boot-time",
        DebugEnabled => "debug-enabled",
        DebugOptions => "debug-options",
        DefaultInterface => "default-interface",
        Enabled => "enabled",
        FixedPort => "fixed-port",
        FixedSourcePort => "fixed-source-port",
        Host => "host",
        Interface => "interface",
        JavaHome => "java-home",
        ManagementSubsystemEndpoint => "management-subsystem-endpoint",
        MaxSize => "max-size",
        Module => "module",
        MulticastAddress => "multicast-address",
        MulticastPort => "multicast-port",
        Name => "name",
        NoNamespaceSchemaLocation => "noNamespaceSchemaLocation",
        Path => "path",
        Pattern => "pattern",
        Port => "port",
        PortOffset => "port-offset",
        Profile => "profile",
        Ref => "ref",
        RelativeTo => "relative-to",
        RuntimeName => "runtime-name",
        SchemaLocation => "schemaLocation",
        Sha1 => "sha1",
        Size => "size",
        SocketBindingGroup => "socket-binding-group",
        SocketBindingRef => "socket-binding-ref",
        SourceInterface => "source-interface",
        SourcePort => "source-port",
        Type => "type",
        Value => "value",
    }
);

/// How an interface selection criterion is carried in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Criterion {
    /// An empty element whose presence is the value.
    Flag,
    /// An empty element carrying its value in one attribute.
    Valued(Attribute),
}

impl Element {
    /// Returns the criterion shape if this element is an interface criterion.
    pub(crate) fn criterion(&self) -> Option<Criterion> {
        match self {
            Element::InetAddress | Element::LoopbackAddress | Element::SubnetMatch => {
                Some(Criterion::Valued(Attribute::Value))
            }
            Element::Nic => Some(Criterion::Valued(Attribute::Name)),
            Element::NicMatch => Some(Criterion::Valued(Attribute::Pattern)),
            Element::AnyAddress
            | Element::AnyIpv4Address
            | Element::AnyIpv6Address
            | Element::LinkLocalAddress
            | Element::Loopback
            | Element::Multicast
            | Element::PointToPoint
            | Element::PublicAddress
            | Element::SiteLocalAddress
            | Element::Up
            | Element::Virtual => Some(Criterion::Flag),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_criterion_shapes() {
        assert_eq!(Element::Nic.criterion(), Some(Criterion::Valued(Attribute::Name)));
        assert_eq!(Element::Loopback.criterion(), Some(Criterion::Flag));
        assert_eq!(Element::Interface.criterion(), None);
    }

    #[test]
    fn test_names_map_both_ways() {
        assert_eq!(Element::from_local_name("socket-binding-groups"), Element::SocketBindingGroups);
        assert_eq!(Element::SocketBindingGroups.local_name(), "socket-binding-groups");
        assert_eq!(Element::from_local_name("not-an-element"), Element::Unknown);

        assert_eq!(
            Attribute::from_local_name("management-subsystem-endpoint"),
            Attribute::ManagementSubsystemEndpoint
        );
        assert_eq!(Attribute::from_local_name("Name"), Attribute::Unknown);
    }
}
