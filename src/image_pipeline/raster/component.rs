/// Numeric type of one output component.
///
/// Decoders compute every value as a normalized `f32` and convert it once
/// when writing. Float components keep the value as is; integer components
/// clamp to `[0, 1]` and scale to their full range.
pub trait Component: Copy + Default + PartialEq + Send + Sync + 'static {
    const BITS: u32;
    const IS_FLOAT: bool;

    fn from_unit(value: f32) -> Self;

    fn write_be(self, out: &mut Vec<u8>);

    fn write_le(self, out: &mut Vec<u8>);
}

macro_rules! impl_component {
    ($ty:ty, $bits:expr, $is_float:expr, $value:ident => $convert:expr) => {
        impl Component for $ty {
            const BITS: u32 = $bits;
            const IS_FLOAT: bool = $is_float;

            #[inline(always)]
            fn from_unit($value: f32) -> Self {
                $convert
            }

            fn write_be(self, out: &mut Vec<u8>) {
                out.extend_from_slice(&self.to_be_bytes());
            }

            fn write_le(self, out: &mut Vec<u8>) {
                out.extend_from_slice(&self.to_le_bytes());
            }
        }
    };
}

impl_component!(f32, 32, true, value => value);
impl_component!(f64, 64, true, value => value as f64);
impl_component!(u8, 8, false, value => (value.clamp(0.0, 1.0) * u8::MAX as f32).round() as u8);
impl_component!(u16, 16, false, value => (value.clamp(0.0, 1.0) * u16::MAX as f32).round() as u16);
