/*

    Whitespace-delimited text format shared by all
    value types, e.g. "25 25 25" for a Vector3 and
    "0 0 0 10 10 10" for a BoundingBox.

    Floats are written with Rust's shortest round-trip
    representation, so format -> parse gives back the
    exact same bits.

    @date: 21 Nov, 2025
    @author: bartu
*/

use std::fmt;

use crate::error::{GeometryError, GeomResult};
use crate::numeric::{Float, Matrix4, Vector3};

/// Parse exactly N whitespace separated floats.
pub fn parse_components<const N: usize>(s: &str) -> GeomResult<[Float; N]> {
    let parts: Vec<&str> = s.split_whitespace().collect();
    if parts.len() != N {
        return Err(GeometryError::ComponentCount { expected: N, actual: parts.len() });
    }

    let mut out = [0.0; N];
    for (slot, token) in out.iter_mut().zip(parts) {
        *slot = token.parse::<Float>().map_err(|source| GeometryError::InvalidNumber {
            token: token.to_string(),
            source,
        })?;
    }
    Ok(out)
}

pub fn write_components(f: &mut fmt::Formatter<'_>, components: &[Float]) -> fmt::Result {
    for (i, c) in components.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{}", c)?;
    }
    Ok(())
}

pub fn format_components(components: &[Float]) -> String {
    components
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn parse_vec3(s: &str) -> GeomResult<Vector3> {
    parse_components::<3>(s).map(Vector3::from_array)
}

/// Matrix entries in M11..M44 order.
pub fn parse_matrix(s: &str) -> GeomResult<Matrix4> {
    parse_components::<16>(s).map(|m| Matrix4::from_cols_array(&m))
}

pub fn format_matrix(m: &Matrix4) -> String {
    format_components(&m.to_cols_array())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_vec3_with_irregular_whitespace() {
        let v = parse_vec3("  1 -2.5\t3e2 ").unwrap();
        assert_eq!(v, Vector3::new(1.0, -2.5, 300.0));
    }

    #[test]
    fn rejects_wrong_component_count() {
        assert_eq!(
            parse_vec3("1 2"),
            Err(GeometryError::ComponentCount { expected: 3, actual: 2 })
        );
        assert!(matches!(
            parse_components::<2>("1 two"),
            Err(GeometryError::InvalidNumber { ref token, .. }) if token == "two"
        ));
    }

    #[test]
    fn vec3_text_round_trips_exactly() {
        let v = Vector3::new(0.1, 1.0 / 3.0, -7.25e-12);
        assert_eq!(parse_vec3(&format_components(&v.to_array())).unwrap(), v);
        assert_eq!(format_components(&[1.0, 2.0, 3.0]), "1 2 3");
    }

    #[test]
    fn matrix_text_uses_m11_to_m44_order() {
        let m = Matrix4::from_translation(Vector3::new(4.0, 5.0, 6.0));
        let s = format_matrix(&m);
        // Translation lives in M41 M42 M43
        assert_eq!(s, "1 0 0 0 0 1 0 0 0 0 1 0 4 5 6 1");
        assert_eq!(parse_matrix(&s).unwrap(), m);
    }
}
