//! ELF machine (instruction-set architecture) identifier.

use std::fmt;

/// Architecture identifier taken from the `e_machine` field of an ELF header.
///
/// Only equality is meaningful. `Display` renders the canonical constant name
/// from the ELF gABI so that error messages read like
/// `wanted: EM_X86_64, received: EM_AARCH64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Machine(u16);

impl Machine {
    pub const NONE: Self = Self(0);
    pub const SPARC: Self = Self(2);
    pub const X86: Self = Self(3);
    pub const MIPS: Self = Self(8);
    pub const PPC: Self = Self(20);
    pub const PPC64: Self = Self(21);
    pub const S390: Self = Self(22);
    pub const ARM: Self = Self(40);
    pub const SPARCV9: Self = Self(43);
    pub const IA_64: Self = Self(50);
    pub const X86_64: Self = Self(62);
    pub const AARCH64: Self = Self(183);
    pub const RISCV: Self = Self(243);
    pub const LOONGARCH: Self = Self(258);

    /// Wrap a raw `e_machine` value.
    #[must_use]
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    /// The raw `e_machine` value.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Canonical `EM_*` name, if this value is one we know.
    #[must_use]
    pub const fn name(self) -> Option<&'static str> {
        let name = match self.0 {
            0 => "EM_NONE",
            2 => "EM_SPARC",
            3 => "EM_386",
            8 => "EM_MIPS",
            20 => "EM_PPC",
            21 => "EM_PPC64",
            22 => "EM_S390",
            40 => "EM_ARM",
            43 => "EM_SPARCV9",
            50 => "EM_IA_64",
            62 => "EM_X86_64",
            183 => "EM_AARCH64",
            243 => "EM_RISCV",
            258 => "EM_LOONGARCH",
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Display for Machine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "EM_UNKNOWN({:#06x})", self.0),
        }
    }
}

impl From<u16> for Machine {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_machines_display_constant_names() {
        assert_eq!(Machine::X86_64.to_string(), "EM_X86_64");
        assert_eq!(Machine::AARCH64.to_string(), "EM_AARCH64");
        assert_eq!(Machine::X86.to_string(), "EM_386");
        assert_eq!(Machine::from_raw(243).to_string(), "EM_RISCV");
    }

    #[test]
    fn test_unknown_machine_displays_raw_value() {
        let machine = Machine::from_raw(0x1234);
        assert!(machine.name().is_none());
        assert_eq!(machine.to_string(), "EM_UNKNOWN(0x1234)");
    }

    #[test]
    fn test_equality_is_by_raw_value() {
        assert_eq!(Machine::from(62), Machine::X86_64);
        assert_ne!(Machine::X86_64, Machine::AARCH64);
        assert_eq!(Machine::AARCH64.raw(), 183);
    }
}
