//! Enums spelled the way xlsx attributes spell them

/// Declares a fieldless enum together with its xlsx attribute spellings.
///
/// Generates `as_str`, `FromStr` (rejecting anything else with
/// [`Error::UnknownKeyword`](crate::Error::UnknownKeyword)) and `Display`.
/// The first variant is the default.
macro_rules! xlsx_keyword {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $first:ident => $first_str:literal,
            $($variant:ident => $str:literal,)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub enum $name {
            #[default]
            $first,
            $($variant,)*
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $name::$first => $first_str,
                    $($name::$variant => $str,)*
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = crate::error::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $first_str => Ok($name::$first),
                    $($str => Ok($name::$variant),)*
                    _ => Err(crate::error::Error::unknown_keyword($kind, s)),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub(crate) use xlsx_keyword;
