use std::fmt::Debug;

/// T values are primitive integers
pub trait PrimInt: ::num::PrimInt + Debug + Default {}
impl<T: ::num::PrimInt + Debug + Default> PrimInt for T {}

/// Values that can be coerced into an integer coordinate of any primitive type.
///
/// Integers are cast if they fit, floats are truncated toward zero and strings are trimmed and
/// parsed as base-10 integers. `None` means the value can't be represented as `Idx`.
pub trait Coordinate: Debug {
    fn to_coordinate<Idx: PrimInt>(&self) -> Option<Idx>;
}

macro_rules! impl_integer_coordinate {
    ($($t:ty),*) => {$(
        impl Coordinate for $t {
            #[inline(always)]
            fn to_coordinate<Idx: PrimInt>(&self) -> Option<Idx> {
                ::num::cast(*self)
            }
        }
    )*};
}

macro_rules! impl_float_coordinate {
    ($($t:ty),*) => {$(
        impl Coordinate for $t {
            fn to_coordinate<Idx: PrimInt>(&self) -> Option<Idx> {
                if !self.is_finite() {
                    return None;
                }
                ::num::cast(self.trunc())
            }
        }
    )*};
}

impl_integer_coordinate!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
impl_float_coordinate!(f32, f64);

impl Coordinate for str {
    fn to_coordinate<Idx: PrimInt>(&self) -> Option<Idx> {
        let value = self.trim();
        match value.parse::<i64>() {
            Ok(parsed) => ::num::cast(parsed),
            // Might still be a valid unsigned value above i64::MAX
            Err(_) => value.parse::<u64>().ok().and_then(::num::cast),
        }
    }
}

impl Coordinate for String {
    fn to_coordinate<Idx: PrimInt>(&self) -> Option<Idx> {
        self.as_str().to_coordinate()
    }
}

impl<C: Coordinate + ?Sized> Coordinate for &C {
    #[inline(always)]
    fn to_coordinate<Idx: PrimInt>(&self) -> Option<Idx> {
        (**self).to_coordinate()
    }
}
