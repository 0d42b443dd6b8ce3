/// Pixel operations behind each filter kind
///
/// All operations work on an RGBA8 copy of the input and return a new
/// image with the same dimensions. Alpha is carried through untouched.

use image::{imageops, DynamicImage, ImageBuffer, Rgba, RgbaImage};

/// Replace each `scale`-sized block with its mean colour
///
/// Scales below 1.5 round to a block of one pixel, which leaves the image
/// unchanged.
pub fn pixellate(input: &DynamicImage, scale: f32) -> DynamicImage {
    let src = input.to_rgba8();
    let (w, h) = src.dimensions();
    let block = (scale.round() as u32).max(1);

    if block == 1 {
        return DynamicImage::ImageRgba8(src);
    }

    let mut out: RgbaImage = ImageBuffer::new(w, h);

    for by in (0..h).step_by(block as usize) {
        for bx in (0..w).step_by(block as usize) {
            // Blocks on the right and bottom edges may be cut short
            let x_end = (bx + block).min(w);
            let y_end = (by + block).min(h);

            // Step 1: Sum every channel over the block
            let mut sums = [0u32; 4];
            let mut count = 0u32;
            for y in by..y_end {
                for x in bx..x_end {
                    let p = src.get_pixel(x, y).0;
                    for c in 0..4 {
                        sums[c] += p[c] as u32;
                    }
                    count += 1;
                }
            }

            // Step 2: Paint the whole block with the mean
            let mean = Rgba(sums.map(|s| ((s as f32 / count as f32).round()) as u8));
            for y in by..y_end {
                for x in bx..x_end {
                    out.put_pixel(x, y, mean);
                }
            }
        }
    }

    DynamicImage::ImageRgba8(out)
}

/// Darken towards the corners
///
/// `radius` is expressed in percent of the half-diagonal: the darkening
/// ramps from nothing at the centre to `intensity` at that distance.
pub fn vignette(input: &DynamicImage, intensity: f32, radius: f32) -> DynamicImage {
    let mut buf = input.to_rgba8();
    let (w, h) = buf.dimensions();

    let cx = w as f32 / 2.0;
    let cy = h as f32 / 2.0;
    let half_diagonal = (cx * cx + cy * cy).sqrt().max(f32::EPSILON);
    let reach = radius / 100.0;

    for (x, y, px) in buf.enumerate_pixels_mut() {
        let dx = x as f32 + 0.5 - cx;
        let dy = y as f32 + 0.5 - cy;
        let d = (dx * dx + dy * dy).sqrt() / half_diagonal;

        let factor = 1.0 - intensity * smoothstep(0.0, reach, d);
        for c in 0..3 {
            px[c] = (px[c] as f32 * factor).round().clamp(0.0, 255.0) as u8;
        }
    }

    DynamicImage::ImageRgba8(buf)
}

/// Sobel gradient magnitude per colour channel, scaled by `intensity`
///
/// Flat regions go black and edges light up. Border pixels reuse their
/// nearest neighbour.
pub fn edges(input: &DynamicImage, intensity: f32) -> DynamicImage {
    const KX: [[f32; 3]; 3] = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
    const KY: [[f32; 3]; 3] = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

    let src = input.to_rgba8();
    let (w, h) = src.dimensions();
    let mut out: RgbaImage = ImageBuffer::new(w, h);

    for y in 0..h {
        for x in 0..w {
            let mut gx = [0.0f32; 3];
            let mut gy = [0.0f32; 3];

            // Convolve the 3x3 neighbourhood with both kernels at once
            for (ky, row) in KX.iter().enumerate() {
                for (kx, &wx) in row.iter().enumerate() {
                    let sx = (x as i64 + kx as i64 - 1).clamp(0, w as i64 - 1) as u32;
                    let sy = (y as i64 + ky as i64 - 1).clamp(0, h as i64 - 1) as u32;
                    let p = src.get_pixel(sx, sy).0;
                    let wy = KY[ky][kx];
                    for c in 0..3 {
                        gx[c] += wx * p[c] as f32;
                        gy[c] += wy * p[c] as f32;
                    }
                }
            }

            // Magnitude per channel, alpha from the centre pixel
            let alpha = src.get_pixel(x, y)[3];
            let mut px = [0u8, 0, 0, alpha];
            for c in 0..3 {
                let magnitude = (gx[c] * gx[c] + gy[c] * gy[c]).sqrt() * intensity;
                px[c] = magnitude.round().clamp(0.0, 255.0) as u8;
            }
            out.put_pixel(x, y, Rgba(px));
        }
    }

    DynamicImage::ImageRgba8(out)
}

/// Gaussian blur with sigma = `radius`; a zero radius is the identity
pub fn gaussian_blur(input: &DynamicImage, radius: f32) -> DynamicImage {
    let src = input.to_rgba8();
    if radius <= 0.0 {
        return DynamicImage::ImageRgba8(src);
    }
    DynamicImage::ImageRgba8(blur(&src, radius))
}

/// Box-blur approximation of a gaussian, cost independent of sigma
///
/// Sigma is capped at half the shorter edge so the boxes fit inside the
/// image. The cap scales with the image, so a preview and its full-size
/// source are capped alike.
fn blur(src: &RgbaImage, sigma: f32) -> RgbaImage {
    let (w, h) = src.dimensions();
    let cap = (w.min(h) as f32 / 2.0).max(0.5);
    imageops::fast_blur(src, sigma.min(cap))
}

/// Sharpen by adding back `amount` times the detail lost to a blur of `radius`
pub fn unsharp_mask(input: &DynamicImage, radius: f32, amount: f32) -> DynamicImage {
    let src = input.to_rgba8();
    if radius <= 0.0 || amount.abs() < f32::EPSILON {
        return DynamicImage::ImageRgba8(src);
    }

    let blurred = blur(&src, radius);
    let (w, h) = src.dimensions();
    let mut out: RgbaImage = ImageBuffer::new(w, h);

    for (x, y, px) in out.enumerate_pixels_mut() {
        let s = src.get_pixel(x, y).0;
        let b = blurred.get_pixel(x, y).0;
        let mut new_px = [0u8, 0, 0, s[3]];
        for c in 0..3 {
            let val = s[c] as f32 + amount * (s[c] as f32 - b[c] as f32);
            new_px[c] = val.round().clamp(0.0, 255.0) as u8;
        }
        *px = Rgba(new_px);
    }

    DynamicImage::ImageRgba8(out)
}

/// Blend towards a sepia rendition; `intensity` 0 is the original, 1 full sepia
pub fn sepia_tone(input: &DynamicImage, intensity: f32) -> DynamicImage {
    let mut buf = input.to_rgba8();

    for px in buf.pixels_mut() {
        let r = px[0] as f32;
        let g = px[1] as f32;
        let b = px[2] as f32;

        let sepia = [
            0.393 * r + 0.769 * g + 0.189 * b,
            0.349 * r + 0.686 * g + 0.168 * b,
            0.272 * r + 0.534 * g + 0.131 * b,
        ];

        for c in 0..3 {
            let mixed = px[c] as f32 * (1.0 - intensity) + sepia[c].min(255.0) * intensity;
            px[c] = mixed.round().clamp(0.0, 255.0) as u8;
        }
    }

    DynamicImage::ImageRgba8(buf)
}

/// Hermite interpolation between `edge0` and `edge1`
///
/// A degenerate range acts as a hard step at `edge0`.
fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge1 <= edge0 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
