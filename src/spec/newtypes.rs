//! Validated newtypes for generated Python names.
//!
//! `ClassName` and `MethodName` wrap `String` values that have passed
//! identifier validation at construction time, so the emitter and the
//! patcher never handle unchecked names.

use std::borrow::Borrow;
use std::fmt;

use super::error::SpecError;
use super::identifier::validate_identifier;

macro_rules! validated_name {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            /// Creates a new name after validating the input.
            ///
            /// # Errors
            ///
            /// Returns [`SpecError::InvalidIdentifier`] if the string is not
            /// a legal Python identifier.
            pub fn new(s: impl Into<String>) -> Result<Self, SpecError> {
                let name: String = s.into();
                validate_identifier(&name)?;
                Ok(Self(name))
            }

            /// Returns the inner string as a slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

validated_name!(
    /// A validated Python class name derived from a feature title.
    ClassName
);

validated_name!(
    /// A validated Python method name derived from a scenario title or a
    /// step sentence.
    MethodName
);
