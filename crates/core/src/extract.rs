//! Typed extraction from parsed definitions.
//!
//! Every extractor follows the same policy: a missing definition is
//! [`FieldError::Missing`], a value with the wrong tag is
//! [`FieldError::Invalid`], and a value with the right tag but the wrong
//! shape is [`FieldError::Malformed`]. The `get_def*` wrappers log the
//! failure and leave the destination untouched.

use serde::Serialize;

use crate::error::FieldError;
use crate::term::{Def, Term};

/// Why a term could not be converted. Turned into a [`FieldError`] once
/// the definition name and source file are known.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    Invalid,
    Malformed(String),
}

/// A value that can be read out of a single term.
pub trait FromDef: Sized {
    /// Upper-case shape name for diagnostics.
    const KIND: &'static str;

    fn from_term(term: &Term) -> Result<Self, Rejection>;
}

/// Extract a `T` from `def`.
pub fn def_value<T: FromDef>(def: Option<&Def>, file: &str) -> Result<T, FieldError> {
    let def = def.ok_or_else(|| FieldError::Missing {
        kind: T::KIND,
        file: file.to_owned(),
    })?;
    T::from_term(&def.value).map_err(|r| rejection_to_error(r, T::KIND, def, file))
}

/// Extract into `dst`, logging and returning `false` on failure.
pub fn get_def<T: FromDef>(dst: &mut T, def: Option<&Def>, file: &str) -> bool {
    store(dst, def_value(def, file))
}

fn store<T>(dst: &mut T, result: Result<T, FieldError>) -> bool {
    match result {
        Ok(v) => {
            *dst = v;
            true
        }
        Err(e) => {
            tracing::warn!("{}", e);
            false
        }
    }
}

fn rejection_to_error(r: Rejection, kind: &'static str, def: &Def, file: &str) -> FieldError {
    match r {
        Rejection::Invalid => FieldError::Invalid {
            kind,
            name: def.name.clone(),
            file: file.to_owned(),
        },
        Rejection::Malformed(detail) => FieldError::Malformed {
            kind,
            name: def.name.clone(),
            file: file.to_owned(),
            detail,
        },
    }
}

/// All elements of an array term as numbers.
fn numbers(term: &Term) -> Result<Vec<f64>, Rejection> {
    let elems = term.as_array().ok_or(Rejection::Invalid)?;
    elems
        .iter()
        .enumerate()
        .map(|(i, e)| {
            e.as_number().ok_or_else(|| {
                Rejection::Malformed(format!("element {} is a {}, not a number", i, e.kind()))
            })
        })
        .collect()
}

fn numbers_exact<const N: usize>(term: &Term) -> Result<[f64; N], Rejection> {
    let values = numbers(term)?;
    let len = values.len();
    values
        .try_into()
        .map_err(|_| Rejection::Malformed(format!("expected {} numbers, found {}", N, len)))
}

// ── Scalars ──────────────────────────────────────────────────────────

/// Numeric destinations. Conversion from the parsed `f64` follows `as`
/// semantics: truncation toward zero, saturating at the type's range.
pub trait Numeric: Copy {
    fn from_f64(v: f64) -> Self;
}

macro_rules! numeric {
    ($($t:ty),*) => {$(
        impl Numeric for $t {
            fn from_f64(v: f64) -> Self {
                v as $t
            }
        }

        impl FromDef for $t {
            const KIND: &'static str = "NUMBER";

            fn from_term(term: &Term) -> Result<Self, Rejection> {
                term.as_number().map(<$t>::from_f64).ok_or(Rejection::Invalid)
            }
        }
    )*};
}

numeric!(i32, u32, i64, f32, f64);

impl FromDef for bool {
    const KIND: &'static str = "BOOL";

    fn from_term(term: &Term) -> Result<Self, Rejection> {
        term.as_bool().ok_or(Rejection::Invalid)
    }
}

impl FromDef for String {
    const KIND: &'static str = "TEXT";

    fn from_term(term: &Term) -> Result<Self, Rejection> {
        term.as_text().map(str::to_owned).ok_or(Rejection::Invalid)
    }
}

/// Dynamic numeric array; replaces the destination completely.
impl<T: Numeric> FromDef for Vec<T> {
    const KIND: &'static str = "ARRAY";

    fn from_term(term: &Term) -> Result<Self, Rejection> {
        Ok(numbers(term)?.into_iter().map(T::from_f64).collect())
    }
}

// ── Shapes ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Vec3 { x, y, z }
    }
}

impl FromDef for Vec3 {
    const KIND: &'static str = "VEC3";

    fn from_term(term: &Term) -> Result<Self, Rejection> {
        let [x, y, z] = numbers_exact::<3>(term)?;
        Ok(Vec3::new(x as f32, y as f32, z as f32))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl FromDef for Rect {
    const KIND: &'static str = "RECT";

    fn from_term(term: &Term) -> Result<Self, Rejection> {
        let [x, y, w, h] = numbers_exact::<4>(term)?;
        Ok(Rect {
            x: x as i32,
            y: y as i32,
            w: w as i32,
            h: h as i32,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Insets {
    pub left: u16,
    pub right: u16,
    pub top: u16,
    pub bottom: u16,
}

impl FromDef for Insets {
    const KIND: &'static str = "INSETS";

    fn from_term(term: &Term) -> Result<Self, Rejection> {
        let [left, right, top, bottom] = numbers_exact::<4>(term)?;
        Ok(Insets {
            left: left as u16,
            right: right as u16,
            top: top as u16,
            bottom: bottom as u16,
        })
    }
}

/// Byte RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::rgb(0, 0, 0)
    }
}

/// Three numbers, either normalized or raw bytes.
///
/// When every component lies in `[0, 1]` the triple is taken as normalized
/// and scaled by 255; otherwise each component is cast to a byte directly.
/// A raw `(0, 0, 1)` is therefore read as normalized blue.
impl FromDef for Color {
    const KIND: &'static str = "COLOR";

    fn from_term(term: &Term) -> Result<Self, Rejection> {
        let rgb = numbers_exact::<3>(term)?;
        let normalized = rgb.iter().all(|v| (0.0..=1.0).contains(v));
        let [r, g, b] = rgb.map(|v| {
            if normalized {
                (v * 255.0).round() as u8
            } else {
                v as u8
            }
        });
        Ok(Color::rgb(r, g, b))
    }
}

/// Floating-point RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorValue {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Default for ColorValue {
    fn default() -> Self {
        ColorValue {
            r: 0.0,
            g: 0.0,
            b: 0.0,
            a: 1.0,
        }
    }
}

impl FromDef for ColorValue {
    const KIND: &'static str = "COLOR";

    fn from_term(term: &Term) -> Result<Self, Rejection> {
        let values = numbers(term)?;
        match values[..] {
            [r, g, b] => Ok(ColorValue {
                r: r as f32,
                g: g as f32,
                b: b as f32,
                a: 1.0,
            }),
            [r, g, b, a] => Ok(ColorValue {
                r: r as f32,
                g: g as f32,
                b: b as f32,
                a: a as f32,
            }),
            _ => Err(Rejection::Malformed(format!(
                "expected 3 or 4 numbers, found {}",
                values.len()
            ))),
        }
    }
}

// ── Fixed arrays and durations ───────────────────────────────────────

/// Fill a fixed-size destination from an array definition.
///
/// Extra source elements are ignored; destination slots beyond the source
/// length keep their values. Returns the number of slots written.
pub fn def_array<T: Numeric>(
    dst: &mut [T],
    def: Option<&Def>,
    file: &str,
) -> Result<usize, FieldError> {
    let values: Vec<T> = def_value(def, file)?;
    let n = values.len().min(dst.len());
    dst[..n].copy_from_slice(&values[..n]);
    Ok(n)
}

pub fn get_def_array<T: Numeric>(dst: &mut [T], def: Option<&Def>, file: &str) -> bool {
    match def_array(dst, def, file) {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!("{}", e);
            false
        }
    }
}

/// Seconds in one day.
pub const ONE_DAY: i64 = 24 * 60 * 60;

/// Parse `h:m:s` or `d/h:m:s` into seconds.
///
/// Segments are read in order; the first one that is not an integer stops
/// parsing and it and every later segment count as zero. The total is
/// clamped to the `i32` range.
pub fn parse_duration(text: &str) -> i32 {
    let text = text.trim();
    let weights: &[i64] = if text.contains('/') {
        &[ONE_DAY, 3600, 60, 1]
    } else {
        &[3600, 60, 1]
    };
    let total: i64 = text
        .split(['/', ':'])
        .zip(weights)
        .map_while(|(seg, w)| seg.trim().parse::<i64>().ok().map(|v| v.saturating_mul(*w)))
        .fold(0i64, i64::saturating_add);
    total.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Duration in seconds from a text definition.
pub fn def_time(def: Option<&Def>, file: &str) -> Result<i32, FieldError> {
    let def = def.ok_or_else(|| FieldError::Missing {
        kind: "TIME",
        file: file.to_owned(),
    })?;
    match &def.value {
        Term::Text(s) => Ok(parse_duration(s)),
        _ => Err(rejection_to_error(Rejection::Invalid, "TIME", def, file)),
    }
}

pub fn get_def_time(dst: &mut i32, def: Option<&Def>, file: &str) -> bool {
    store(dst, def_time(def, file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_str;

    /// First top-level definition in `src`.
    fn def_of(src: &str) -> Def {
        parse_str(src, "test.def")
            .unwrap()
            .into_iter()
            .find_map(|t| t.as_def().cloned())
            .expect("no definition in source")
    }

    #[test]
    fn vec3_from_bare_list() {
        let d = def_of("loc = 1.0, 2.0, 3.0");
        let mut v = Vec3::default();
        assert!(get_def(&mut v, Some(&d), "test.def"));
        assert_eq!(v, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn vec3_wrong_arity_leaves_destination() {
        let mut v = Vec3::new(9.0, 9.0, 9.0);
        for src in ["loc = [1, 2]", "loc = [1, 2, 3, 4]"] {
            let d = def_of(src);
            assert!(!get_def(&mut v, Some(&d), "test.def"));
            assert_eq!(v, Vec3::new(9.0, 9.0, 9.0));
        }
        let err = def_value::<Vec3>(Some(&def_of("loc = [1, 2]")), "f.def").unwrap_err();
        assert!(matches!(err, FieldError::Malformed { kind: "VEC3", .. }));
    }

    #[test]
    fn missing_and_invalid() {
        let err = def_value::<Vec3>(None, "f.def").unwrap_err();
        assert_eq!(err.to_string(), "missing VEC3 definition in 'f.def'");

        let err = def_value::<Vec3>(Some(&def_of("loc = \"here\"")), "f.def").unwrap_err();
        assert_eq!(err.to_string(), "invalid VEC3 'loc' in 'f.def'");
    }

    #[test]
    fn non_number_element_is_malformed() {
        let mut v: Vec<f32> = vec![1.0];
        assert!(!get_def(&mut v, Some(&def_of("a = [1, \"x\"]")), "f.def"));
        assert_eq!(v, vec![1.0]);
    }

    #[test]
    fn color_normalized_and_raw_meet_at_the_boundary() {
        let scaled: Color = def_value(Some(&def_of("c = [0.0, 0.0, 1.0]")), "f").unwrap();
        let raw: Color = def_value(Some(&def_of("c = [0, 0, 255]")), "f").unwrap();
        assert_eq!(scaled, Color::rgb(0, 0, 255));
        assert_eq!(raw, Color::rgb(0, 0, 255));
    }

    #[test]
    fn color_rounds_normalized_components() {
        let c: Color = def_value(Some(&def_of("c = [0.5, 0.25, 0.1]")), "f").unwrap();
        assert_eq!(c, Color::rgb(128, 64, 26));
    }

    #[test]
    fn color_any_component_out_of_range_casts_all() {
        let c: Color = def_value(Some(&def_of("c = [0.5, 2, 300]")), "f").unwrap();
        assert_eq!(c, Color::rgb(0, 2, 255));
    }

    #[test]
    fn color_value_alpha_defaults_to_one() {
        let c: ColorValue = def_value(Some(&def_of("c = [0.1, 0.2, 0.3]")), "f").unwrap();
        assert_eq!(c.a, 1.0);
        let c: ColorValue = def_value(Some(&def_of("c = [0.1, 0.2, 0.3, 0.5]")), "f").unwrap();
        assert_eq!(c.a, 0.5);
        assert!(def_value::<ColorValue>(Some(&def_of("c = [1, 2]")), "f").is_err());
    }

    #[test]
    fn rect_and_insets() {
        let r: Rect = def_value(Some(&def_of("r = [10, 20, 300, 400]")), "f").unwrap();
        assert_eq!(r, Rect { x: 10, y: 20, w: 300, h: 400 });
        let i: Insets = def_value(Some(&def_of("i = (1, 2, 3, 4)")), "f").unwrap();
        assert_eq!(i, Insets { left: 1, right: 2, top: 3, bottom: 4 });
    }

    #[test]
    fn fixed_array_truncates_to_capacity() {
        let mut dst = [0i32; 3];
        let d = def_of("a = [1, 2, 3, 4, 5]");
        assert_eq!(def_array(&mut dst, Some(&d), "f").unwrap(), 3);
        assert_eq!(dst, [1, 2, 3]);

        let mut dst = [7.0f32; 4];
        assert!(get_def_array(&mut dst, Some(&def_of("a = [1.5]")), "f"));
        assert_eq!(dst, [1.5, 7.0, 7.0, 7.0]);
    }

    #[test]
    fn dynamic_array_replaces_contents() {
        let mut dst: Vec<u32> = vec![9, 9, 9, 9];
        assert!(get_def(&mut dst, Some(&def_of("a = [1, 2]")), "f"));
        assert_eq!(dst, vec![1, 2]);
    }

    #[test]
    fn numbers_truncate_toward_zero() {
        let n: i32 = def_value(Some(&def_of("n = -2.7")), "f").unwrap();
        assert_eq!(n, -2);
        let u: u32 = def_value(Some(&def_of("n = -5")), "f").unwrap();
        assert_eq!(u, 0);
    }

    #[test]
    fn text_and_bool() {
        let mut s = String::from("old");
        assert!(get_def(&mut s, Some(&def_of("name = \"Alpha Wing\"")), "f"));
        assert_eq!(s, "Alpha Wing");
        assert!(!get_def(&mut s, Some(&def_of("name = 3")), "f"));
        assert_eq!(s, "Alpha Wing");

        let mut b = false;
        assert!(get_def(&mut b, Some(&def_of("flag = true")), "f"));
        assert!(b);
        assert!(!get_def(&mut b, Some(&def_of("flag = 0")), "f"));
        assert!(b);
    }

    #[test]
    fn duration_formats() {
        assert_eq!(parse_duration("1/02:03:04"), 86400 + 2 * 3600 + 3 * 60 + 4);
        assert_eq!(parse_duration("02:03:04"), 2 * 3600 + 3 * 60 + 4);
        assert_eq!(parse_duration("01:30"), 3600 + 30 * 60);
        assert_eq!(parse_duration("2/"), 2 * 86400);
        assert_eq!(parse_duration("00:xx:10"), 0);
        assert_eq!(parse_duration(""), 0);
    }

    #[test]
    fn duration_clamps_to_i32() {
        assert_eq!(parse_duration("99999999/00:00:00"), i32::MAX);
    }

    #[test]
    fn time_requires_text() {
        let mut t = 5;
        assert!(get_def_time(&mut t, Some(&def_of("t = \"00:01:00\"")), "f"));
        assert_eq!(t, 60);
        assert!(!get_def_time(&mut t, Some(&def_of("t = 60")), "f"));
        assert_eq!(t, 60);
        assert!(matches!(
            def_time(None, "f"),
            Err(FieldError::Missing { kind: "TIME", .. })
        ));
    }
}
