/// Wavefront OBJ parser producing a triangulated `Mesh`
///
/// Only `v`, `vn` and `f` records are interpreted; every other record type
/// (texture coordinates, groups, materials, comments) is skipped.
use log::{debug, info};
use nalgebra::{Point3, Vector3};
use nom::{
    character::complete::{char, digit1, multispace0, multispace1, not_line_ending},
    combinator::{all_consuming, map_res, opt, recognize, verify},
    number::complete::float,
    sequence::{pair, preceded},
    IResult,
};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{FormatError, MeshError};
use crate::geometry::{Mesh, MeshBuilder};
use crate::triangulate::{Corner, FanTriangulator, Triangulator};

/// Options controlling what the parser emits besides triangles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Collect unique polygon boundary edges into `Mesh::edge_indices`
    pub collect_edges: bool,
}

/// Line-oriented OBJ parser, generic over the face triangulation strategy
#[derive(Debug, Clone, Default)]
pub struct MeshParser<T = FanTriangulator> {
    triangulator: T,
    options: ParseOptions,
}

impl MeshParser<FanTriangulator> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T: Triangulator> MeshParser<T> {
    pub fn with_triangulator(triangulator: T) -> Self {
        Self {
            triangulator,
            options: ParseOptions::default(),
        }
    }

    pub fn options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// Open and parse an OBJ file
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Mesh, MeshError> {
        let path = path.as_ref();
        info!("Loading OBJ file: {}", path.display());

        let file = File::open(path).map_err(|source| MeshError::Resource {
            path: path.to_path_buf(),
            source,
        })?;
        let mesh = self.parse_stream(BufReader::new(file), path)?;

        info!(
            "Loaded {}: {} positions, {} triangles, {} outline edges",
            path.display(),
            mesh.positions().len(),
            mesh.triangle_count(),
            mesh.edge_indices().len() / 2
        );
        Ok(mesh)
    }

    /// Parse OBJ text from any buffered reader
    pub fn parse_reader<R: BufRead>(&self, reader: R) -> Result<Mesh, MeshError> {
        self.parse_stream(reader, Path::new("<stream>"))
    }

    /// Parse OBJ text held in memory
    pub fn parse(&self, input: &str) -> Result<Mesh, MeshError> {
        self.parse_reader(input.as_bytes())
    }

    /// Lines are read as raw bytes; only `v`, `vn` and `f` records must be UTF-8
    fn parse_stream<R: BufRead>(&self, mut reader: R, origin: &Path) -> Result<Mesh, MeshError> {
        let mut state = ParseState::new(self.options);
        let mut line = Vec::new();
        let mut number = 0;
        loop {
            line.clear();
            let read = reader
                .read_until(b'\n', &mut line)
                .map_err(|source| MeshError::Resource {
                    path: origin.to_path_buf(),
                    source,
                })?;
            if read == 0 {
                break;
            }
            number += 1;
            state
                .consume(&line, &self.triangulator)
                .map_err(|kind| MeshError::format(number, kind))?;
        }
        Ok(state.finish())
    }
}

/// Parse OBJ text with fan triangulation and default options
pub fn parse_obj(input: &str) -> Result<Mesh, MeshError> {
    MeshParser::new().parse(input)
}

/// Load an OBJ file with fan triangulation and default options
pub fn load_obj(path: impl AsRef<Path>) -> Result<Mesh, MeshError> {
    MeshParser::new().load(path)
}

/// Staging lists filled while the stream is consumed
struct ParseState {
    options: ParseOptions,
    builder: MeshBuilder,
    normals: Vec<Vector3<f32>>,
    seen_edges: HashSet<(u32, u32)>,
}

impl ParseState {
    fn new(options: ParseOptions) -> Self {
        Self {
            options,
            builder: MeshBuilder::new(),
            normals: Vec::new(),
            seen_edges: HashSet::new(),
        }
    }

    fn consume<T: Triangulator>(
        &mut self,
        line: &[u8],
        triangulator: &T,
    ) -> Result<(), FormatError> {
        let line = line.trim_ascii();
        let (keyword, rest) = match line.iter().position(|b| b.is_ascii_whitespace()) {
            Some(at) => line.split_at(at),
            None => (line, &[][..]),
        };

        match keyword {
            b"v" => {
                let rest = record_text(rest, FormatError::InvalidNumber)?;
                let (x, y, z) = run_record(position_record, rest)?;
                self.builder.push_position(Point3::new(x, y, z));
            }
            b"vn" => {
                let rest = record_text(rest, FormatError::InvalidNumber)?;
                let (x, y, z) = run_record(normal_record, rest)?;
                self.normals.push(Vector3::new(x, y, z));
            }
            b"f" => {
                let rest = record_text(rest, FormatError::InvalidIndex)?;
                self.consume_face(rest, triangulator)?;
            }
            _ => {}
        }
        Ok(())
    }

    fn consume_face<T: Triangulator>(
        &mut self,
        record: &str,
        triangulator: &T,
    ) -> Result<(), FormatError> {
        let record = strip_comment(record);
        let corners = record
            .split_whitespace()
            .map(|token| self.resolve_corner(token))
            .collect::<Result<Vec<_>, _>>()?;

        // Corners are range-checked above; triangles index them directly
        let triangles = triangulator.triangulate(&corners, self.builder.positions())?;
        for [a, b, c] in triangles {
            let (a, b, c) = (corners[a], corners[b], corners[c]);
            self.builder.push_triangle(
                [a.position, b.position, c.position],
                [self.normals[a.normal], self.normals[b.normal], self.normals[c.normal]],
            )?;
        }

        if self.options.collect_edges {
            for (i, corner) in corners.iter().enumerate() {
                let next = corners[(i + 1) % corners.len()];
                self.push_edge(corner.position, next.position)?;
            }
        }
        Ok(())
    }

    fn resolve_corner(&self, token: &str) -> Result<Corner, FormatError> {
        let (_, raw) = all_consuming(corner)(token)
            .map_err(|_| FormatError::InvalidIndex(token.to_string()))?;
        let normal = raw
            .normal
            .ok_or_else(|| FormatError::MissingNormal(token.to_string()))?;

        let position_count = self.builder.position_count();
        let position = resolve_index(raw.position, position_count)
            .and_then(|i| u32::try_from(i).ok())
            .ok_or(FormatError::PositionOutOfRange {
                index: raw.position,
                count: position_count,
            })?;
        let normal = resolve_index(normal, self.normals.len()).ok_or(
            FormatError::NormalOutOfRange {
                index: normal,
                count: self.normals.len(),
            },
        )?;

        Ok(Corner { position, normal })
    }

    fn push_edge(&mut self, a: u32, b: u32) -> Result<(), FormatError> {
        if a != b && self.seen_edges.insert((a.min(b), a.max(b))) {
            self.builder.push_edge(a, b)?;
        }
        Ok(())
    }

    fn finish(self) -> Mesh {
        let mesh = self.builder.build();
        debug!(
            "Parsed {} positions, {} raw normals, {} draw corners",
            mesh.positions().len(),
            self.normals.len(),
            mesh.indices().len()
        );
        mesh
    }
}

/// A face corner as written, 1-based or negative (relative) indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RawCorner {
    position: i64,
    normal: Option<i64>,
}

/// Map an OBJ index onto `0..count`; negative values count back from the end
fn resolve_index(raw: i64, count: usize) -> Option<usize> {
    let resolved = match raw {
        0 => return None,
        r if r > 0 => r - 1,
        r => count as i64 + r,
    };
    usize::try_from(resolved).ok().filter(|&i| i < count)
}

fn run_record<'a, O>(
    parser: impl FnMut(&'a str) -> IResult<&'a str, O>,
    record: &'a str,
) -> Result<O, FormatError> {
    all_consuming(parser)(record)
        .map(|(_, out)| out)
        .map_err(|_| FormatError::InvalidNumber(record.trim().to_string()))
}

/// Decode a record body, reporting undecodable bytes as `kind`
fn record_text(record: &[u8], kind: fn(String) -> FormatError) -> Result<&str, FormatError> {
    std::str::from_utf8(record)
        .map_err(|_| kind(String::from_utf8_lossy(record).trim().to_string()))
}

fn strip_comment(record: &str) -> &str {
    record.split_once('#').map_or(record, |(data, _)| data)
}

/// A float literal that fits in `f32`; `nan`, `inf` and overflow are rejected
fn finite(input: &str) -> IResult<&str, f32> {
    verify(float, |v: &f32| v.is_finite())(input)
}

fn parse_vector3(input: &str) -> IResult<&str, (f32, f32, f32)> {
    let (input, _) = multispace0(input)?;
    let (input, x) = finite(input)?;
    let (input, _) = multispace1(input)?;
    let (input, y) = finite(input)?;
    let (input, _) = multispace1(input)?;
    let (input, z) = finite(input)?;
    Ok((input, (x, y, z)))
}

/// Whitespace, then an optional `#` comment, up to the end of the record
fn record_end(input: &str) -> IResult<&str, ()> {
    let (input, _) = multispace0(input)?;
    let (input, _) = opt(preceded(char('#'), not_line_ending))(input)?;
    Ok((input, ()))
}

/// `x y z [w]`; the homogeneous weight is accepted and dropped
fn position_record(input: &str) -> IResult<&str, (f32, f32, f32)> {
    let (input, xyz) = parse_vector3(input)?;
    let (input, _w) = opt(preceded(multispace1, finite))(input)?;
    let (input, _) = record_end(input)?;
    Ok((input, xyz))
}

fn normal_record(input: &str) -> IResult<&str, (f32, f32, f32)> {
    let (input, xyz) = parse_vector3(input)?;
    let (input, _) = record_end(input)?;
    Ok((input, xyz))
}

fn index(input: &str) -> IResult<&str, i64> {
    map_res(recognize(pair(opt(char('-')), digit1)), str::parse)(input)
}

/// `p`, `p/t`, `p//n` or `p/t/n`
fn corner(input: &str) -> IResult<&str, RawCorner> {
    let (input, position) = index(input)?;
    let (input, texcoord) = opt(preceded(char('/'), opt(index)))(input)?;
    let (input, normal) = match texcoord {
        Some(_) => opt(preceded(char('/'), index))(input)?,
        None => (input, None),
    };
    Ok((input, RawCorner { position, normal }))
}
