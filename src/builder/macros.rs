//! Macros for declaring message types.

/// Generate a unit-variant enum implementing [`Message`](crate::core::Message).
///
/// Each variant's id is its name.
///
/// # Example
///
/// ```
/// use state_actuator::core::Message;
/// use state_actuator::message_enum;
///
/// message_enum! {
///     pub enum CounterMsg {
///         Increment,
///         Decrement,
///         Reset,
///     }
/// }
///
/// assert_eq!(CounterMsg::Reset.id(), "Reset");
/// ```
#[macro_export]
macro_rules! message_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::Message for $name {
            fn id(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}
