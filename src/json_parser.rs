/*

    Provide utilities to (de)serialize bounding volumes
    and load culling queries from JSON files.

    Vector3 fields are written as {"x": .., "y": .., "z": ..}
    and are read back from any of these forms:
        {"x": 1, "y": 2, "z": 3}
        "1 2 3"
        [1, 2, 3]

    Matrices are written as an array of 16 numbers in
    M11..M44 order, and may also be given as a string of
    16 whitespace separated numbers.

    Bounding volumes inside query files can be given either
    as structs or in their text form, see deser_string_or_struct.

    @date: 2 Oct, 2025
    @author: bartu
*/

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::marker::PhantomData;
use std::path::Path;
use std::str::FromStr;

use serde::de::{self, DeserializeOwned, MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serializer};

use crate::error::LoadError;
use crate::text::{parse_matrix, parse_vec3};
use crate::prelude::*;

pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {

    let span = tracing::span!(tracing::Level::INFO, "load_json");
    let _enter = span.enter();

    let path_str = path.display().to_string();
    let file = File::open(path).map_err(|source| LoadError::Io { path: path_str.clone(), source })?;
    let reader = BufReader::new(file);
    debug!("Reading file from {}", path_str);

    serde_json::from_reader(reader).map_err(|source| LoadError::Json { path: path_str, source })
}

pub(crate) fn ser_vec3<S>(v: &Vector3, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut state = serializer.serialize_struct("Vector3", 3)?;
    state.serialize_field("x", &v.x)?;
    state.serialize_field("y", &v.y)?;
    state.serialize_field("z", &v.z)?;
    state.end()
}

pub(crate) fn deser_vec3<'de, D>(deserializer: D) -> Result<Vector3, D::Error>
where
    D: Deserializer<'de>,
{
    struct Vec3Visitor;

    impl<'de> Visitor<'de> for Vec3Visitor {
        type Value = Vector3;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a Vec3 as a map {x, y, z}, a string 'x y z' or an array [x, y, z]")
        }

        // Given "X Y Z"
        fn visit_str<E>(self, value: &str) -> Result<Vector3, E>
        where
            E: de::Error,
        {
            parse_vec3(value).map_err(de::Error::custom)
        }

        // Given [X, Y, Z]
        fn visit_seq<A>(self, mut seq: A) -> Result<Vector3, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let x: Float = seq
                .next_element()?
                .ok_or_else(|| de::Error::custom("Expected 3 elements in Vec3 array"))?;
            let y: Float = seq
                .next_element()?
                .ok_or_else(|| de::Error::custom("Expected 3 elements in Vec3 array"))?;
            let z: Float = seq
                .next_element()?
                .ok_or_else(|| de::Error::custom("Expected 3 elements in Vec3 array"))?;
            if seq.next_element::<Float>()?.is_some() {
                return Err(de::Error::custom("Expected only 3 elements in Vec3 array"));
            }
            Ok(Vector3::new(x, y, z))
        }

        // Given {"x": X, "y": Y, "z": Z}
        fn visit_map<M>(self, mut map: M) -> Result<Vector3, M::Error>
        where
            M: MapAccess<'de>,
        {
            let (mut x, mut y, mut z) = (None, None, None);
            while let Some(key) = map.next_key::<String>()? {
                match key.as_str() {
                    "x" => x = Some(map.next_value::<Float>()?),
                    "y" => y = Some(map.next_value::<Float>()?),
                    "z" => z = Some(map.next_value::<Float>()?),
                    other => return Err(de::Error::unknown_field(other, &["x", "y", "z"])),
                }
            }
            Ok(Vector3::new(
                x.ok_or_else(|| de::Error::missing_field("x"))?,
                y.ok_or_else(|| de::Error::missing_field("y"))?,
                z.ok_or_else(|| de::Error::missing_field("z"))?,
            ))
        }
    }

    deserializer.deserialize_any(Vec3Visitor)
}

pub(crate) fn deser_float<'de, D>(deserializer: D) -> Result<Float, D::Error>
where
    D: Deserializer<'de>,
{
    /*
        Deserialize float type given as either string or number in JSON
    */
    let s: serde_json::Value = Deserialize::deserialize(deserializer)?;
    match s {
        serde_json::Value::Number(n) => n.as_f64()
            .ok_or_else(|| de::Error::custom("Invalid float")),
        serde_json::Value::String(s) => s.trim().parse::<Float>()
            .map_err(|_| de::Error::custom(format!("Failed to parse float from '{s}'"))),
        t => Err(de::Error::custom(format!("Expected float or string, found {t}"))),
    }
}

pub(crate) fn ser_matrix<S>(m: &Matrix4, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_seq(m.to_cols_array())
}

pub(crate) fn deser_matrix<'de, D>(deserializer: D) -> Result<Matrix4, D::Error>
where
    D: Deserializer<'de>,
{
    struct MatrixVisitor;

    impl<'de> Visitor<'de> for MatrixVisitor {
        type Value = Matrix4;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("16 numbers in M11..M44 order, as an array or a whitespace separated string")
        }

        fn visit_str<E>(self, value: &str) -> Result<Matrix4, E>
        where
            E: de::Error,
        {
            parse_matrix(value).map_err(de::Error::custom)
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Matrix4, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let mut m = [0.0 as Float; 16];
            for (i, slot) in m.iter_mut().enumerate() {
                *slot = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(i, &self))?;
            }
            if seq.next_element::<Float>()?.is_some() {
                return Err(de::Error::custom("Expected only 16 elements in matrix array"));
            }
            Ok(Matrix4::from_cols_array(&m))
        }
    }

    deserializer.deserialize_any(MatrixVisitor)
}

/// deser_matrix for an optional field, pair it with #[serde(default)].
/// An explicit null reads as None.
pub(crate) fn deser_opt_matrix<'de, D>(deserializer: D) -> Result<Option<Matrix4>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct MatrixField(#[serde(deserialize_with = "deser_matrix")] Matrix4);

    let field = Option::<MatrixField>::deserialize(deserializer)?;
    Ok(field.map(|MatrixField(m)| m))
}

// DISCLAIMER: This function is adapted from
// https://serde.rs/string-or-struct.html
pub fn deser_string_or_struct<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: Deserialize<'de> + FromStr,
    T::Err: fmt::Display,
    D: Deserializer<'de>,
{
    // Forwards string types to T's `FromStr` impl and map types
    // to T's `Deserialize` impl. PhantomData keeps T in the visitor.
    struct StringOrStruct<T>(PhantomData<fn() -> T>);

    impl<'de, T> Visitor<'de> for StringOrStruct<T>
    where
        T: Deserialize<'de> + FromStr,
        T::Err: fmt::Display,
    {
        type Value = T;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("string or map")
        }

        fn visit_str<E>(self, value: &str) -> Result<T, E>
        where
            E: de::Error,
        {
            FromStr::from_str(value).map_err(de::Error::custom)
        }

        fn visit_map<M>(self, map: M) -> Result<T, M::Error>
        where
            M: MapAccess<'de>,
        {
            // `MapAccessDeserializer` turns a `MapAccess` into a `Deserializer`
            // so T's own `Deserialize` impl can consume the map entries.
            Deserialize::deserialize(de::value::MapAccessDeserializer::new(map))
        }
    }

    deserializer.deserialize_any(StringOrStruct(PhantomData))
}

/// Like deser_string_or_struct, for every element of a JSON array.
pub fn deser_vec_string_or_struct<'de, T, D>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    T: Deserialize<'de> + FromStr,
    T::Err: fmt::Display,
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(bound(deserialize = "T: Deserialize<'de> + FromStr, T::Err: fmt::Display"))]
    struct Element<T>(#[serde(deserialize_with = "deser_string_or_struct")] T);

    let elements = Vec::<Element<T>>::deserialize(deserializer)?;
    Ok(elements.into_iter().map(|Element(t)| t).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Holder {
        #[serde(serialize_with = "ser_vec3", deserialize_with = "deser_vec3")]
        v: Vector3,
        #[serde(serialize_with = "ser_matrix", deserialize_with = "deser_matrix")]
        m: Matrix4,
    }

    #[test]
    fn vec3_accepts_map_string_and_array() {
        let m = r#"{"v": {"x": 1, "y": 2.5, "z": -3}, "m": "1 0 0 0 0 1 0 0 0 0 1 0 0 0 0 1"}"#;
        let s = r#"{"v": "1 2.5 -3", "m": [1,0,0,0, 0,1,0,0, 0,0,1,0, 0,0,0,1]}"#;
        let a = r#"{"v": [1, 2.5, -3], "m": "1 0 0 0 0 1 0 0 0 0 1 0 0 0 0 1"}"#;
        for json in [m, s, a] {
            let h: Holder = serde_json::from_str(json).unwrap();
            assert_eq!(h.v, Vector3::new(1.0, 2.5, -3.0));
            assert_eq!(h.m, Matrix4::IDENTITY);
        }
    }

    #[test]
    fn vec3_rejects_bad_input() {
        assert!(serde_json::from_str::<Holder>(r#"{"v": [1, 2], "m": "1 0 0 0 0 1 0 0 0 0 1 0 0 0 0 1"}"#).is_err());
        assert!(serde_json::from_str::<Holder>(r#"{"v": {"x": 1, "y": 2}, "m": "1 0 0 0 0 1 0 0 0 0 1 0 0 0 0 1"}"#).is_err());
        assert!(serde_json::from_str::<Holder>(r#"{"v": "1 2 3", "m": [1, 2, 3]}"#).is_err());
    }

    #[test]
    fn holder_serializes_vec3_as_map_and_matrix_as_array() {
        let h = Holder { v: Vector3::new(1.0, 2.0, 3.0), m: Matrix4::IDENTITY };
        let json = serde_json::to_value(&h).unwrap();
        assert_eq!(json["v"]["y"], 2.0);
        assert_eq!(json["m"].as_array().map(|a| a.len()), Some(16));
        let back: Holder = serde_json::from_value(json).unwrap();
        assert_eq!(back, h);
    }

    #[test]
    fn float_accepts_number_or_string() {
        #[derive(Deserialize)]
        struct F {
            #[serde(deserialize_with = "deser_float")]
            f: Float,
        }
        assert_eq!(serde_json::from_str::<F>(r#"{"f": 45}"#).unwrap().f, 45.0);
        assert_eq!(serde_json::from_str::<F>(r#"{"f": " 0.1 "}"#).unwrap().f, 0.1);
        assert!(serde_json::from_str::<F>(r#"{"f": "abc"}"#).is_err());
        assert!(serde_json::from_str::<F>(r#"{"f": true}"#).is_err());
    }

    #[test]
    fn optional_matrix_accepts_null_and_missing() {
        #[derive(Deserialize)]
        struct OptHolder {
            #[serde(default, deserialize_with = "deser_opt_matrix")]
            m: Option<Matrix4>,
        }
        assert_eq!(serde_json::from_str::<OptHolder>(r#"{"m": null}"#).unwrap().m, None);
        assert_eq!(serde_json::from_str::<OptHolder>("{}").unwrap().m, None);
        let h: OptHolder = serde_json::from_str(r#"{"m": "1 0 0 0 0 1 0 0 0 0 1 0 0 0 0 1"}"#).unwrap();
        assert_eq!(h.m, Some(Matrix4::IDENTITY));
        assert!(serde_json::from_str::<OptHolder>(r#"{"m": [1, 2]}"#).is_err());
    }

    #[test]
    fn load_json_reads_file_from_disk() {
        let dir = std::env::temp_dir().join("frustum_bounds_load_json");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("holder.json");
        std::fs::write(&path, r#"{"v": "1 2 3", "m": "1 0 0 0 0 1 0 0 0 0 1 0 0 0 0 1"}"#).unwrap();

        let h: Holder = load_json(&path).unwrap();
        assert_eq!(h.v, Vector3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn load_json_reports_missing_file() {
        let err = load_json::<Holder>(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
