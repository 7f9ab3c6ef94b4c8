//! Helper macro for generating store error enums.
//!
//! Every store failure carries the store's message verbatim, so each variant
//! holds a single `message` field and displays it unchanged. The variant
//! only classifies the failure.

macro_rules! define_store_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $kind:literal
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error("{message}")]
                $variant { message: String },
            )*
        }

        impl $name {
            $(
                ::paste::paste! {
                    /// Build a failure of this kind from the store message.
                    pub fn [<$variant:snake>](message: impl Into<String>) -> Self {
                        Self::$variant {
                            message: message.into(),
                        }
                    }
                }
            )*

            /// Message reported by the store.
            pub fn message(&self) -> &str {
                match self {
                    $( Self::$variant { message } => message.as_str(), )*
                }
            }

            /// Short classification used in logs.
            pub fn kind(&self) -> &'static str {
                match self {
                    $( Self::$variant { .. } => $kind, )*
                }
            }
        }
    };
}

pub(crate) use define_store_error;

#[cfg(test)]
mod tests {
    define_store_error! {
        pub enum ExampleStoreError {
            Transport => "transport",
            Rejected => "rejected",
        }
    }

    #[test]
    fn display_is_the_store_message_verbatim() {
        let err = ExampleStoreError::rejected("User already registered");
        assert_eq!(err.to_string(), "User already registered");
        assert_eq!(err.message(), "User already registered");
    }

    #[test]
    fn kind_names_the_variant() {
        assert_eq!(ExampleStoreError::transport("reset").kind(), "transport");
        assert_eq!(ExampleStoreError::rejected("no").kind(), "rejected");
    }
}
