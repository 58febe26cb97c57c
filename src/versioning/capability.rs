// Wed Jan 21 2026 - Alex

use std::fmt;

/// One native struct kind the VM exposes. Exactly one accessor
/// implementation is active per capability at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Assembly,
    Class,
    Event,
    Exception,
    Field,
    Image,
    Method,
    Parameter,
    Property,
    Type,
}

impl Capability {
    pub const ALL: [Capability; 10] = [
        Capability::Assembly,
        Capability::Class,
        Capability::Event,
        Capability::Exception,
        Capability::Field,
        Capability::Image,
        Capability::Method,
        Capability::Parameter,
        Capability::Property,
        Capability::Type,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Capability::Assembly => "assembly",
            Capability::Class => "class",
            Capability::Event => "event",
            Capability::Exception => "exception",
            Capability::Field => "field",
            Capability::Image => "image",
            Capability::Method => "method",
            Capability::Parameter => "parameter",
            Capability::Property => "property",
            Capability::Type => "type",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
