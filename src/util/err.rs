/// Converts errors from their error type (of the submodule) to that of
/// a [`horizon::Error`](crate::Error) variant, or of another module error.
///
/// ```rust,ignore
/// use horizon::spatial::SpatialError;
/// horizon::impl_err!(SpatialError, Spatial);
/// horizon::impl_err!(GeoError, SpatialError, Geo);
/// ```
pub mod err_macro {
    #[macro_export]
    macro_rules! impl_err {
        ($from:ty, $variant:ident) => {
            impl From<$from> for $crate::Error {
                fn from(value: $from) -> Self {
                    $crate::Error::$variant(value)
                }
            }
        };
        ($from:ty, $to:ty, $variant:ident) => {
            impl From<$from> for $to {
                fn from(value: $from) -> Self {
                    <$to>::$variant(value)
                }
            }
        };
    }

    pub use impl_err;
}
