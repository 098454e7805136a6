//! Level description text format
//!
//! Line oriented. Records start with a marker line:
//!
//! ```text
//! MESH
//! Dirt.001
//! <Matrix 4x4 (1.0000, 0.0000, 0.0000, 0.0000)
//!             (0.0000, 1.0000, 0.0000, 0.0000)
//!             (0.0000, 0.0000, 1.0000, 0.0000)
//!             (0.5000, 5.0000, 0.0000, 1.0000)>
//! TEXTURE
//! ../Textures/dirt.png
//! <Vector (-0.4000, -0.1500, -0.1000)>
//! ... 8 corners: LBN, LTN, LTF, LBF, RBN, RTN, RTF, RBF
//! LIGHT
//! SUN
//! Color: 1.0 0.9 0.8
//! Direction: -0.5 -1.0 -0.2
//! ```
//!
//! The matrix is written in row-vector layout (translation on the last row),
//! so each written row becomes one glam column.

use glam::{Mat4, Vec3};

use crate::error::LevelError;

/// One `MESH` record as written in the file
#[derive(Debug, Clone, PartialEq)]
pub struct MeshRecord {
    pub name: String,
    /// 1-based line of the object name
    pub line: usize,
    pub transform: Mat4,
    pub texture: Option<String>,
    /// Authored bounding box corners, local space
    pub corners: [Vec3; 8],
}

/// One `LIGHT` record of type `SUN`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunRecord {
    pub color: Vec3,
    pub direction: Vec3,
}

/// Everything a level file describes, before any file resolution
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LevelFile {
    pub meshes: Vec<MeshRecord>,
    pub sun: Option<SunRecord>,
}

/// Line cursor that remembers 1-based line numbers
struct Cursor<'a> {
    lines: std::iter::Peekable<std::iter::Enumerate<std::str::Lines<'a>>>,
    last: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().enumerate().peekable(),
            last: 0,
        }
    }

    fn next(&mut self) -> Option<(usize, &'a str)> {
        let (idx, line) = self.lines.next()?;
        self.last = idx + 1;
        Some((idx + 1, line.trim_end_matches('\r')))
    }

    fn require(&mut self, what: &str) -> Result<(usize, &'a str), LevelError> {
        self.next()
            .ok_or_else(|| LevelError::parse(self.last + 1, format!("unexpected end of file, expected {what}")))
    }

    fn peek_is(&mut self, marker: &str) -> bool {
        self.lines
            .peek()
            .is_some_and(|(_, line)| line.trim() == marker)
    }
}

/// Parse a complete level description
pub fn parse_level(text: &str) -> Result<LevelFile, LevelError> {
    let mut cursor = Cursor::new(text);
    let mut level = LevelFile::default();

    while let Some((line_no, line)) = cursor.next() {
        match line.trim() {
            "MESH" => level.meshes.push(parse_mesh(&mut cursor)?),
            "LIGHT" => {
                if let Some(sun) = parse_light(&mut cursor)? {
                    level.sun = Some(sun);
                }
            }
            "" => {}
            other => log::trace!("line {line_no}: skipping `{other}`"),
        }
    }

    Ok(level)
}

fn parse_mesh(cursor: &mut Cursor<'_>) -> Result<MeshRecord, LevelError> {
    let (line, name) = cursor.require("object name")?;
    let name = name.trim();
    if name.is_empty() {
        return Err(LevelError::parse(line, "empty object name"));
    }

    let mut data = [0.0f32; 16];
    for row in 0..4 {
        let (row_line, text) = cursor.require("matrix row")?;
        let values = parse_numbers(row_line, text, 4)?;
        data[row * 4..row * 4 + 4].copy_from_slice(&values);
    }
    let transform = Mat4::from_cols_array(&data);

    let texture = if cursor.peek_is("TEXTURE") {
        cursor.next();
        let (_, path) = cursor.require("texture path")?;
        Some(path.trim().to_string())
    } else {
        None
    };

    let mut corners = [Vec3::ZERO; 8];
    for corner in &mut corners {
        let (corner_line, text) = cursor.require("bounding box corner")?;
        let values = parse_numbers(corner_line, text, 3)?;
        *corner = Vec3::new(values[0], values[1], values[2]);
    }

    Ok(MeshRecord {
        name: name.to_string(),
        line,
        transform,
        texture,
        corners,
    })
}

fn parse_light(cursor: &mut Cursor<'_>) -> Result<Option<SunRecord>, LevelError> {
    let (_, kind) = cursor.require("light type")?;
    if kind.trim() != "SUN" {
        log::debug!("ignoring light of type `{}`", kind.trim());
        return Ok(None);
    }

    let (color_line, color) = cursor.require("sun color")?;
    let color = parse_labeled(color_line, color, "Color:")?;
    let (dir_line, direction) = cursor.require("sun direction")?;
    let direction = parse_labeled(dir_line, direction, "Direction:")?;

    Ok(Some(SunRecord { color, direction }))
}

/// Read `count` comma-separated floats from inside the last `( ... )` of a line
fn parse_numbers(line: usize, text: &str, count: usize) -> Result<Vec<f32>, LevelError> {
    let open = text
        .rfind('(')
        .ok_or_else(|| LevelError::parse(line, "missing `(`"))?;
    let rest = &text[open + 1..];
    let close = rest
        .find(')')
        .ok_or_else(|| LevelError::parse(line, "missing `)`"))?;

    let values = rest[..close]
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f32>()
                .map_err(|e| LevelError::parse(line, format!("bad number `{}`: {e}", part.trim())))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if values.len() != count {
        return Err(LevelError::parse(
            line,
            format!("expected {count} numbers, found {}", values.len()),
        ));
    }
    Ok(values)
}

/// Read `Label: x y z`
fn parse_labeled(line: usize, text: &str, label: &str) -> Result<Vec3, LevelError> {
    let body = text
        .trim()
        .strip_prefix(label)
        .ok_or_else(|| LevelError::parse(line, format!("expected `{label}`")))?;

    let values = body
        .split_whitespace()
        .map(|part| {
            part.parse::<f32>()
                .map_err(|e| LevelError::parse(line, format!("bad number `{part}`: {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    match values.as_slice() {
        [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
        _ => Err(LevelError::parse(
            line,
            format!("expected 3 numbers after `{label}`, found {}", values.len()),
        )),
    }
}
