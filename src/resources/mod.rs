//! Asset decoding and GPU resource wrappers.
//!
//! The decode functions here are pure: text or bytes in, flat data out, no
//! GPU state involved. The submodules own one GPU resource each and enforce
//! the bind-before-use discipline:
//!
//! - `mesh` holds vertex/index buffers and the arm/draw state machine
//! - `material` binds exactly one 2D texture
//! - `shader` compiles the render pipeline and caches uniform slots
//! - `texture` holds raw GPU texture creation helpers

pub mod material;
pub mod mesh;
pub mod shader;
pub mod texture;

use crate::error::DecodeError;

/// Number of floats emitted per mesh corner: position, texcoord, normal.
pub const FLOATS_PER_CORNER: usize = 8;

/// Decode a line-oriented mesh description (`.obj` subset).
///
/// Supported directives, one per line: `v x y z`, `vt s t`, `vn x y z` and
/// `f a/b/c d/e/f g/h/i ...` with 1-based indices into the preceding lists.
/// Faces with more than three corners are fan-triangulated. Unknown
/// directives are skipped. The output is a flat float sequence, eight per
/// logical corner (position, texcoord, normal) in emission order.
pub fn decode_obj(source: &str) -> Result<Vec<f32>, DecodeError> {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut texcoords: Vec<[f32; 2]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();
    let mut corners: Vec<f32> = Vec::new();

    for (index, line) in source.lines().enumerate() {
        let line_number = index + 1;
        let mut words = line.split_whitespace();
        match words.next() {
            Some("v") => positions.push(read_floats(words, line_number)?),
            Some("vt") => texcoords.push(read_floats(words, line_number)?),
            Some("vn") => normals.push(read_floats(words, line_number)?),
            Some("f") => {
                let face: Vec<&str> = words.collect();
                if face.len() < 3 {
                    return Err(DecodeError::Mesh {
                        line: line_number,
                        message: format!("face with {} corners", face.len()),
                    });
                }
                // Fan triangulation: corner 0 anchors every triangle.
                for i in 0..face.len() - 2 {
                    for corner in [face[0], face[i + 1], face[i + 2]] {
                        push_corner(
                            corner,
                            &positions,
                            &texcoords,
                            &normals,
                            &mut corners,
                            line_number,
                        )?;
                    }
                }
            }
            _ => {}
        }
    }

    Ok(corners)
}

fn read_floats<'a, const N: usize>(
    words: impl Iterator<Item = &'a str>,
    line: usize,
) -> Result<[f32; N], DecodeError> {
    let mut out = [0.0; N];
    let mut count = 0;
    for word in words.take(N) {
        out[count] = word.parse().map_err(|_| DecodeError::Mesh {
            line,
            message: format!("expected a number, found {:?}", word),
        })?;
        count += 1;
    }
    if count < N {
        return Err(DecodeError::Mesh {
            line,
            message: format!("expected {} components, found {}", N, count),
        });
    }
    Ok(out)
}

/// Resolve one `v/vt/vn` corner and append its eight floats.
fn push_corner(
    description: &str,
    positions: &[[f32; 3]],
    texcoords: &[[f32; 2]],
    normals: &[[f32; 3]],
    corners: &mut Vec<f32>,
    line: usize,
) -> Result<(), DecodeError> {
    let mut refs = description.split('/');
    let position = lookup(refs.next(), positions, "v", line)?;
    let texcoord = lookup(refs.next(), texcoords, "vt", line)?;
    let normal = lookup(refs.next(), normals, "vn", line)?;
    corners.extend_from_slice(&position);
    corners.extend_from_slice(&texcoord);
    corners.extend_from_slice(&normal);
    Ok(())
}

fn lookup<const N: usize>(
    reference: Option<&str>,
    list: &[[f32; N]],
    directive: &str,
    line: usize,
) -> Result<[f32; N], DecodeError> {
    let reference = reference.unwrap_or("");
    let index: usize = reference.parse().map_err(|_| DecodeError::Mesh {
        line,
        message: format!("bad {} reference {:?}", directive, reference),
    })?;
    // Indices are 1-based.
    list.get(index.wrapping_sub(1))
        .copied()
        .ok_or_else(|| DecodeError::Mesh {
            line,
            message: format!("{} index {} out of range", directive, index),
        })
}

/// Decode image bytes to RGBA8, flipping rows top-to-bottom so that texture
/// coordinates with a bottom-left origin sample correctly.
pub fn decode_rgba(bytes: &[u8]) -> Result<image::RgbaImage, DecodeError> {
    let img = image::load_from_memory(bytes)?;
    Ok(img.flipv().to_rgba8())
}

/// Successively halved copies of `img` down to 1x1, one per mip level below
/// the base. Each level is resampled from the previous one, so the chain
/// length matches what the GPU expects for the base dimensions.
pub fn mip_chain(img: &image::RgbaImage) -> Vec<image::RgbaImage> {
    let mut levels: Vec<image::RgbaImage> = Vec::new();
    let (mut width, mut height) = img.dimensions();
    while width > 1 || height > 1 {
        width = (width / 2).max(1);
        height = (height / 2).max(1);
        let source = levels.last().unwrap_or(img);
        let next = image::imageops::resize(
            source,
            width,
            height,
            image::imageops::FilterType::Triangle,
        );
        levels.push(next);
    }
    levels
}
