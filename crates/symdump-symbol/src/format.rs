use std::fmt;
use std::str::FromStr;

/// Integer representation of the addresses handed back to a caller.
///
/// Formats are selected with the same single-character tokens an embedding
/// host uses to describe its native integer kinds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AddressFormat {
    /// Unsigned pointer-width integer (`k`).
    #[default]
    UnsignedLong,

    /// Unsigned 64-bit integer (`K`).
    UnsignedLongLong,

    /// Signed pointer-width integer (`l`).
    Long,

    /// Signed 64-bit integer (`L`).
    LongLong,

    /// Signed size type (`n`).
    SignedSize,
}

impl AddressFormat {
    /// Returns the format associated with the given token.
    pub fn from_token(token: char) -> crate::Result<Self> {
        match token {
            'k' => Ok(Self::UnsignedLong),
            'K' => Ok(Self::UnsignedLongLong),
            'l' => Ok(Self::Long),
            'L' => Ok(Self::LongLong),
            'n' => Ok(Self::SignedSize),
            c => Err(crate::Error::InvalidFormat(c)),
        }
    }

    /// Returns the token of this format.
    pub fn token(self) -> char {
        match self {
            Self::UnsignedLong => 'k',
            Self::UnsignedLongLong => 'K',
            Self::Long => 'l',
            Self::LongLong => 'L',
            Self::SignedSize => 'n',
        }
    }

    /// Renders a runtime address with this format.
    pub fn render(self, addr: u64) -> Address {
        match self {
            Self::UnsignedLong => Address::Unsigned(addr as usize as u64),
            Self::UnsignedLongLong => Address::Unsigned(addr),
            Self::Long | Self::SignedSize => Address::Signed(addr as usize as isize as i64),
            Self::LongLong => Address::Signed(addr as i64),
        }
    }
}

impl FromStr for AddressFormat {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        let mut chars = s.chars();

        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_token(c),
            _ => Err(crate::Error::InvalidArgument(s.to_owned())),
        }
    }
}

impl fmt::Display for AddressFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// Runtime address rendered with an [AddressFormat].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Address {
    /// Unsigned representation.
    Unsigned(u64),

    /// Signed representation.
    Signed(i64),
}

impl Address {
    /// Returns the raw bits of the address.
    pub fn as_u64(self) -> u64 {
        match self {
            Self::Unsigned(addr) => addr,
            Self::Signed(addr) => addr as u64,
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Unsigned(addr) => write!(f, "{addr:#x}"),
            Self::Signed(addr) if addr < 0 => write!(f, "-{:#x}", addr.unsigned_abs()),
            Self::Signed(addr) => write!(f, "{addr:#x}"),
        }
    }
}
