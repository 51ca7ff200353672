//! Tokenizer for the OBJ-style text mesh format.
//!
//! Only the records the renderer consumes are recognised:
//!
//! ```text
//! v  x y z          position
//! vt u v [w]        texture coordinate
//! vn x y z          normal
//! f  p/t/n p/t/n p/t/n   triangle, 1-based indices
//! ```
//!
//! Everything else (comments, groups, materials, smoothing) is skipped.
//! Index validation happens later in [`crate::mesh`], once every attribute
//! array is known.

use std::io::BufRead;

use crate::math::Vec3;
use crate::mesh::LoadError;

/// One `f` record, still holding the raw 1-based indices from the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RawFace {
    /// 1-based source line, kept for error reporting.
    pub line: usize,
    /// `[corner][position, uv, normal]`
    pub corners: [[i64; 3]; 3],
}

/// Attribute arrays and faces exactly as they appear in the file.
#[derive(Debug, Default)]
pub(crate) struct ObjData {
    pub positions: Vec<Vec3>,
    pub uvs: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub faces: Vec<RawFace>,
}

pub(crate) fn parse<R: BufRead>(reader: R) -> Result<ObjData, LoadError> {
    let mut data = ObjData::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| LoadError::Read { source })?;
        let line_no = index + 1;
        let line = line.trim();

        if line.len() < 2 {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            continue;
        };
        let fields: Vec<&str> = tokens.collect();

        match keyword {
            "v" => data.positions.push(parse_vec3(line_no, "v", &fields, 3)?),
            "vn" => data.normals.push(parse_vec3(line_no, "vn", &fields, 3)?),
            "vt" => data.uvs.push(parse_vec3(line_no, "vt", &fields, 2)?),
            "f" => data.faces.push(parse_face(line_no, &fields)?),
            _ => {}
        }
    }

    Ok(data)
}

/// Parse up to three floats; components past `required` default to zero.
fn parse_vec3(
    line: usize,
    record: &'static str,
    fields: &[&str],
    required: usize,
) -> Result<Vec3, LoadError> {
    if fields.len() < required {
        return Err(LoadError::Arity {
            line,
            record,
            expected: required,
            found: fields.len(),
        });
    }

    const COMPONENTS: [&str; 3] = ["x", "y", "z"];
    let mut out = [0.0f32; 3];
    for (slot, (field, name)) in out.iter_mut().zip(fields.iter().zip(COMPONENTS)) {
        *slot = field.parse::<f32>().map_err(|_| LoadError::Parse {
            line,
            field: name,
            value: field.to_string(),
        })?;
    }

    Ok(Vec3::new(out[0], out[1], out[2]))
}

fn parse_face(line: usize, fields: &[&str]) -> Result<RawFace, LoadError> {
    if fields.len() != 3 {
        return Err(LoadError::Arity {
            line,
            record: "f",
            expected: 3,
            found: fields.len(),
        });
    }

    let mut corners = [[0i64; 3]; 3];
    for (corner, group) in corners.iter_mut().zip(fields) {
        *corner = parse_face_group(line, group)?;
    }

    Ok(RawFace { line, corners })
}

/// Split `p/t/n` into its three indices.
fn parse_face_group(line: usize, group: &str) -> Result<[i64; 3], LoadError> {
    const PARTS: [&str; 3] = ["position index", "uv index", "normal index"];

    let parts: Vec<&str> = group.split('/').collect();
    if parts.len() != 3 {
        return Err(LoadError::Parse {
            line,
            field: "face corner",
            value: group.to_string(),
        });
    }

    let mut out = [0i64; 3];
    for (slot, (part, name)) in out.iter_mut().zip(parts.iter().zip(PARTS)) {
        *slot = part.parse::<i64>().map_err(|_| LoadError::Parse {
            line,
            field: name,
            value: part.to_string(),
        })?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_record_kinds() {
        let src = "\
# comment
o thing
v 1 2 3
vt 0.5 0.25
vn 0 0 1
s off
f 1/1/1 1/1/1 1/1/1
";
        let data = parse(src.as_bytes()).unwrap();
        assert_eq!(data.positions, vec![Vec3::new(1.0, 2.0, 3.0)]);
        assert_eq!(data.uvs, vec![Vec3::new(0.5, 0.25, 0.0)]);
        assert_eq!(data.normals, vec![Vec3::new(0.0, 0.0, 1.0)]);
        assert_eq!(data.faces.len(), 1);
        assert_eq!(data.faces[0].line, 7);
        assert_eq!(data.faces[0].corners, [[1, 1, 1]; 3]);
    }

    #[test]
    fn ignores_short_and_unknown_lines() {
        let src = "v\nx\n\nvp 1 2 3\nmtllib a.mtl\n";
        let data = parse(src.as_bytes()).unwrap();
        assert!(data.positions.is_empty());
        assert!(data.faces.is_empty());
    }

    #[test]
    fn rejects_quads() {
        let err = parse("f 1/1/1 2/2/2 3/3/3 4/4/4\n".as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Arity {
                line: 1,
                record: "f",
                expected: 3,
                found: 4
            }
        ));
    }

    #[test]
    fn rejects_bad_float() {
        let err = parse("v 1 nope 3\n".as_bytes()).unwrap_err();
        match err {
            LoadError::Parse { line, field, value } => {
                assert_eq!(line, 1);
                assert_eq!(field, "y");
                assert_eq!(value, "nope");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_face_without_uv() {
        let err = parse("f 1//1 2//2 3//3\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::Parse { field: "uv index", .. }));
    }

    #[test]
    fn rejects_missing_components() {
        let err = parse("vn 0 1\n".as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Arity {
                record: "vn",
                expected: 3,
                found: 2,
                ..
            }
        ));
    }
}
