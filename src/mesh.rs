//! Triangle mesh storage and loading.
//!
//! A [`Mesh`] holds three flat, per-corner arrays. Corner `i` of triangle `t`
//! lives at index `3 * t + i` in each of them, so downstream stages walk the
//! arrays three entries at a time and never re-index.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::math::Vec3;
use crate::obj::{self, RawFace};

/// Which attribute array a face index points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Position,
    Uv,
    Normal,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::Position => write!(f, "position"),
            Attribute::Uv => write!(f, "uv"),
            Attribute::Normal => write!(f, "normal"),
        }
    }
}

/// Errors produced while loading a mesh or its texture.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to open {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read mesh data")]
    Read {
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: invalid {field} value {value:?}")]
    Parse {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("line {line}: `{record}` record needs {expected} fields, found {found}")]
    Arity {
        line: usize,
        record: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: {attribute} index {index} out of range (1..={len})")]
    IndexOutOfRange {
        line: usize,
        attribute: Attribute,
        index: i64,
        len: usize,
    },

    #[error("failed to load texture {path}")]
    Texture {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// A triangle face as 0-based indices into the position, uv and normal arrays.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Face {
    pub positions: [usize; 3],
    pub uvs: [usize; 3],
    pub normals: [usize; 3],
}

/// Options applied while loading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Scale positions so the farthest vertex sits on the unit sphere.
    pub normalize: bool,
}

/// The three corners of one triangle, copied out of a [`Mesh`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
}

impl Triangle {
    pub const fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self { a, b, c }
    }

    /// Apply `f` to every corner.
    #[inline]
    pub fn map(self, mut f: impl FnMut(Vec3) -> Vec3) -> Self {
        Self::new(f(self.a), f(self.b), f(self.c))
    }

    #[inline]
    pub fn corners(&self) -> [Vec3; 3] {
        [self.a, self.b, self.c]
    }
}

/// An unrolled triangle mesh. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    positions: Vec<Vec3>,
    uvs: Vec<Vec3>,
    normals: Vec<Vec3>,
}

impl Mesh {
    /// Load a mesh from an OBJ file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        Self::load_with(path, LoadOptions::default())
    }

    pub fn load_with<P: AsRef<Path>>(path: P, options: LoadOptions) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LoadError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let mesh = Self::from_reader(BufReader::new(file), options)?;
        debug!(
            path = %path.display(),
            triangles = mesh.triangle_count(),
            "loaded mesh"
        );
        Ok(mesh)
    }

    /// Parse OBJ text from any buffered reader.
    pub fn from_reader<R: BufRead>(reader: R, options: LoadOptions) -> Result<Self, LoadError> {
        let data = obj::parse(reader)?;
        debug!(
            positions = data.positions.len(),
            uvs = data.uvs.len(),
            normals = data.normals.len(),
            faces = data.faces.len(),
            "parsed obj records"
        );

        let faces = data
            .faces
            .iter()
            .map(|raw| resolve_face(raw, &data.positions, &data.uvs, &data.normals))
            .collect::<Result<Vec<_>, _>>()?;

        let mesh = Self::expand(&data.positions, &data.uvs, &data.normals, &faces);
        Ok(if options.normalize {
            mesh.normalized()
        } else {
            mesh
        })
    }

    /// Parse OBJ text held in memory.
    pub fn from_obj_str(source: &str) -> Result<Self, LoadError> {
        Self::from_reader(source.as_bytes(), LoadOptions::default())
    }

    /// Build a mesh from 0-based indexed attribute arrays.
    ///
    /// A bad index is reported as [`LoadError::IndexOutOfRange`] with `line`
    /// holding the 1-based face number and `index` the 1-based index.
    pub fn from_indexed(
        positions: &[Vec3],
        uvs: &[Vec3],
        normals: &[Vec3],
        faces: &[Face],
    ) -> Result<Self, LoadError> {
        for (number, face) in faces.iter().enumerate() {
            let checks = [
                (Attribute::Position, &face.positions, positions.len()),
                (Attribute::Uv, &face.uvs, uvs.len()),
                (Attribute::Normal, &face.normals, normals.len()),
            ];
            for (attribute, indices, len) in checks {
                if let Some(&bad) = indices.iter().find(|&&i| i >= len) {
                    return Err(LoadError::IndexOutOfRange {
                        line: number + 1,
                        attribute,
                        index: i64::try_from(bad).map_or(i64::MAX, |i| i.saturating_add(1)),
                        len,
                    });
                }
            }
        }
        Ok(Self::expand(positions, uvs, normals, faces))
    }

    /// Copy each face's referenced attributes into the flat arrays, corner order A, B, C.
    fn expand(positions: &[Vec3], uvs: &[Vec3], normals: &[Vec3], faces: &[Face]) -> Self {
        let corners = faces.len() * 3;
        let mut mesh = Self {
            positions: Vec::with_capacity(corners),
            uvs: Vec::with_capacity(corners),
            normals: Vec::with_capacity(corners),
        };

        for face in faces {
            for corner in 0..3 {
                mesh.positions.push(positions[face.positions[corner]]);
                mesh.uvs.push(uvs[face.uvs[corner]]);
                mesh.normals.push(normals[face.normals[corner]]);
            }
        }

        mesh
    }

    /// A copy scaled so that the farthest position lies at distance 1 from the origin.
    pub fn normalized(&self) -> Self {
        let max_len = self
            .positions
            .iter()
            .map(Vec3::magnitude)
            .fold(0.0f32, f32::max);
        if max_len <= f32::EPSILON {
            return self.clone();
        }

        let scale = 1.0 / max_len;
        Self {
            positions: self.positions.iter().map(|p| *p * scale).collect(),
            uvs: self.uvs.clone(),
            normals: self.normals.clone(),
        }
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn uvs(&self) -> &[Vec3] {
        &self.uvs
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Position, uv and normal corners of triangle `index`.
    #[inline]
    pub fn triangle(&self, index: usize) -> Option<(Triangle, Triangle, Triangle)> {
        let base = index.checked_mul(3)?;
        let corners = |arr: &[Vec3]| -> Option<Triangle> {
            Some(Triangle::new(
                *arr.get(base)?,
                *arr.get(base + 1)?,
                *arr.get(base + 2)?,
            ))
        };
        Some((
            corners(&self.positions)?,
            corners(&self.uvs)?,
            corners(&self.normals)?,
        ))
    }
}

/// Convert a raw 1-based face into a validated 0-based one.
fn resolve_face(
    raw: &RawFace,
    positions: &[Vec3],
    uvs: &[Vec3],
    normals: &[Vec3],
) -> Result<Face, LoadError> {
    let to_zero_based = |index: i64, attribute: Attribute, len: usize| {
        if index >= 1 && (index as u64) <= len as u64 {
            Ok((index - 1) as usize)
        } else {
            Err(LoadError::IndexOutOfRange {
                line: raw.line,
                attribute,
                index,
                len,
            })
        }
    };

    let mut face = Face {
        positions: [0; 3],
        uvs: [0; 3],
        normals: [0; 3],
    };
    for (corner, [p, t, n]) in raw.corners.iter().copied().enumerate() {
        face.positions[corner] = to_zero_based(p, Attribute::Position, positions.len())?;
        face.uvs[corner] = to_zero_based(t, Attribute::Uv, uvs.len())?;
        face.normals[corner] = to_zero_based(n, Attribute::Normal, normals.len())?;
    }
    Ok(face)
}

/// A 2×2×2 cube (8 corners, 12 triangles) centred at the origin, UV-mapped
/// per face, with outward normals.
pub const CUBE_OBJ: &str = "\
v -1.0 -1.0  1.0
v  1.0 -1.0  1.0
v  1.0  1.0  1.0
v -1.0  1.0  1.0
v -1.0 -1.0 -1.0
v  1.0 -1.0 -1.0
v  1.0  1.0 -1.0
v -1.0  1.0 -1.0
vt 0.0 0.0
vt 1.0 0.0
vt 1.0 1.0
vt 0.0 1.0
vn  0.0  0.0  1.0
vn  0.0  0.0 -1.0
vn  1.0  0.0  0.0
vn -1.0  0.0  0.0
vn  0.0  1.0  0.0
vn  0.0 -1.0  0.0
# front
f 1/1/1 2/2/1 3/3/1
f 1/1/1 3/3/1 4/4/1
# back
f 6/1/2 5/2/2 8/3/2
f 6/1/2 8/3/2 7/4/2
# right
f 2/1/3 6/2/3 7/3/3
f 2/1/3 7/3/3 3/4/3
# left
f 5/1/4 1/2/4 4/3/4
f 5/1/4 4/3/4 8/4/4
# top
f 4/1/5 3/2/5 7/3/5
f 4/1/5 7/3/5 8/4/5
# bottom
f 5/1/6 6/2/6 2/3/6
f 5/1/6 2/3/6 1/4/6
";
