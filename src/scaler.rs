use rayon::prelude::*;

/// Precomputed mapping from dest pixels to the nearest src pixel
pub struct ScaleLut {
    src_x: Vec<usize>,
    src_row: Vec<usize>, // row offset into src, already multiplied by src width
}

impl ScaleLut {
    pub fn empty() -> Self {
        Self {
            src_x: Vec::new(),
            src_row: Vec::new(),
        }
    }

    pub fn dst_size(&self) -> (usize, usize) {
        (self.src_x.len(), self.src_row.len())
    }
}

pub fn build_scale_lut(dst_w: usize, dst_h: usize, src_w: usize, src_h: usize) -> ScaleLut {
    if src_w == 0 || src_h == 0 {
        return ScaleLut::empty();
    }
    let sx = src_w as f32 / dst_w as f32;
    let sy = src_h as f32 / dst_h as f32;

    let src_x = (0..dst_w)
        .map(|x| ((x as f32 * sx) as usize).min(src_w - 1))
        .collect();
    let src_row = (0..dst_h)
        .map(|y| ((y as f32 * sy) as usize).min(src_h - 1) * src_w)
        .collect();

    ScaleLut { src_x, src_row }
}

/// Parallel nearest-neighbour stretch
/// Rows are processed in parallel for cache friendly writes
pub fn blit_nearest_stretch(dst: &mut [u32], dw: usize, src: &[u32], lut: &ScaleLut) {
    if dw == 0 || lut.src_x.len() != dw {
        return;
    }
    dst.par_chunks_mut(dw)
        .zip(lut.src_row.par_iter())
        .for_each(|(dst_row, &row)| {
            for (px, &x) in dst_row.iter_mut().zip(&lut.src_x) {
                *px = src[row + x];
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_stretch_copies() {
        let src: Vec<u32> = (0..12).collect();
        let lut = build_scale_lut(4, 3, 4, 3);
        let mut dst = vec![0; 12];
        blit_nearest_stretch(&mut dst, 4, &src, &lut);
        assert_eq!(dst, src);
    }

    #[test]
    fn doubling_repeats_pixels() {
        let src = vec![1, 2, 3, 4];
        let lut = build_scale_lut(4, 4, 2, 2);
        assert_eq!(lut.dst_size(), (4, 4));
        let mut dst = vec![0; 16];
        blit_nearest_stretch(&mut dst, 4, &src, &lut);
        assert_eq!(&dst[0..4], &[1, 1, 2, 2]);
        assert_eq!(&dst[12..16], &[3, 3, 4, 4]);
    }
}
