//! The `typed_model!` declaration macro

/// Declare a typed model.
///
/// Expands to the struct itself plus its [`Model`](crate::Model) and
/// [`Marshal`](crate::Marshal) impls. Annotate a field by following its type
/// with `=> "path[, keyword]*"`; fields without an annotation are ignored by
/// the decoder and encoder and may be of any type. The struct must implement
/// `Default`.
///
/// ```
/// use statebind::{typed_model, Decoder, NullLogger, Value};
/// use std::collections::BTreeMap;
///
/// typed_model! {
///     #[derive(Debug, Default, PartialEq)]
///     pub struct Example {
///         pub number: i64 => "number",
///         pub list: Vec<String> => "list_of_strings",
///     }
/// }
///
/// let mut state = BTreeMap::new();
/// state.insert("number".to_string(), Value::Int(42));
///
/// let mut model = Example::default();
/// Decoder::new(&NullLogger).decode(&mut model, &state).unwrap();
/// assert_eq!(model.number, 42);
/// ```
#[macro_export]
macro_rules! typed_model {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $ty:ty $(=> $ann:literal)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: $ty,
            )*
        }

        impl $crate::Model for $name {
            fn model_name() -> &'static str {
                stringify!($name)
            }

            fn fields() -> ::std::vec::Vec<$crate::FieldSpec> {
                ::std::vec![
                    $( $crate::__typed_model_field!($field, $ty $(, $ann)?), )*
                ]
            }

            fn decode_field(
                &mut self,
                field: &str,
                value: &$crate::Value,
                decoder: &$crate::Decoder<'_>,
            ) -> $crate::Result<()> {
                let _ = (value, decoder);
                $( $crate::__typed_model_decode!(self, field, value, decoder, $field, $ty $(, $ann)?); )*
                ::core::result::Result::Err($crate::Error::UnknownField {
                    model: stringify!($name),
                    field: field.to_string(),
                })
            }

            fn encode_field(
                &self,
                field: &str,
                encoder: &$crate::Encoder<'_>,
            ) -> $crate::Result<$crate::Value> {
                let _ = encoder;
                $( $crate::__typed_model_encode!(self, field, encoder, $field, $ty $(, $ann)?); )*
                ::core::result::Result::Err($crate::Error::UnknownField {
                    model: stringify!($name),
                    field: field.to_string(),
                })
            }
        }

        impl $crate::Marshal for $name {
            fn kind() -> $crate::Kind {
                $crate::Kind::Block($crate::BlockType::of::<Self>())
            }

            fn decode(value: &$crate::Value, decoder: &$crate::Decoder<'_>) -> $crate::Result<Self> {
                decoder.decode_block::<Self>(value)
            }

            fn encode(&self, encoder: &$crate::Encoder<'_>) -> $crate::Result<$crate::Value> {
                encoder.encode_block(self)
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __typed_model_field {
    ($field:ident, $ty:ty, $ann:literal) => {
        $crate::FieldSpec::new(
            stringify!($field),
            ::core::option::Option::Some($ann),
            ::core::option::Option::Some(<$ty as $crate::Marshal>::kind()),
        )
    };
    ($field:ident, $ty:ty) => {
        $crate::FieldSpec::new(
            stringify!($field),
            ::core::option::Option::None,
            ::core::option::Option::None,
        )
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __typed_model_decode {
    ($this:ident, $name:ident, $value:ident, $decoder:ident, $field:ident, $ty:ty, $ann:literal) => {
        if $name == stringify!($field) {
            $this.$field = <$ty as $crate::Marshal>::decode($value, $decoder)?;
            return ::core::result::Result::Ok(());
        }
    };
    ($this:ident, $name:ident, $value:ident, $decoder:ident, $field:ident, $ty:ty) => {};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __typed_model_encode {
    ($this:ident, $name:ident, $encoder:ident, $field:ident, $ty:ty, $ann:literal) => {
        if $name == stringify!($field) {
            return <$ty as $crate::Marshal>::encode(&$this.$field, $encoder);
        }
    };
    ($this:ident, $name:ident, $encoder:ident, $field:ident, $ty:ty) => {};
}
