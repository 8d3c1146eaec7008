//! Macro generating port error enums with snake_case constructors.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Constructor generation for port error enums.
    define_port_error! {
        pub enum LookupPortError {
            Unreachable => "lookup store unreachable",
            Rejected { message: String } => "lookup rejected: {message}",
            Truncated { limit: u32 } => "lookup truncated at {limit} rows",
            Partial { message: String, limit: u32 } => "partial lookup: {message} ({limit})",
        }
    }

    #[test]
    fn unit_variants_get_nullary_constructors() {
        assert_eq!(LookupPortError::unreachable(), LookupPortError::Unreachable);
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = LookupPortError::rejected("bad sort");
        assert_eq!(err.to_string(), "lookup rejected: bad sort");
    }

    #[test]
    fn constructors_preserve_non_string_types() {
        let err = LookupPortError::truncated(500_u32);
        assert_eq!(err.to_string(), "lookup truncated at 500 rows");
    }

    #[test]
    fn constructors_support_mixed_fields() {
        let err = LookupPortError::partial("timeout", 20_u32);
        assert_eq!(err.to_string(), "partial lookup: timeout (20)");
    }
}
