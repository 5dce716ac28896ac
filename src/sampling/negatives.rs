//! Background (negative) exemplar sampling

use nalgebra::{DMatrix, Vector2};
use rand::Rng;

use crate::common::errors::PatchError;
use crate::frame::{Frame, Window};

use super::region::region_seg;
use super::windows::{CandidateDictionary, Stride};

/// Sample background patches around the tracked box
///
/// The box interior is first replaced by Gaussian noise so that no window can
/// reproduce the target, then the surrounding region (`scale` times the box)
/// is cut into box-sized windows with `stride`. Returns the patch pixels, one
/// column per window.
///
/// The hidden rectangle spans `size - 1` pixels in each direction starting
/// at the rounded `position`.
#[allow(clippy::too_many_arguments)]
pub fn sample_negatives<R: Rng>(
    frame: &Frame,
    position: &Vector2<f64>,
    size: &Vector2<f64>,
    scale: &Vector2<f64>,
    stride: Stride,
    noise_std: f64,
    rng: &mut R,
) -> Result<DMatrix<f64>, PatchError> {
    let width = size.x.round().max(1.0) as usize;
    let height = size.y.round().max(1.0) as usize;

    let mut hidden = frame.clone();
    let hide = Window::new(
        position.x.round().max(0.0) as usize,
        position.y.round().max(0.0) as usize,
        width - 1,
        height - 1,
    );
    hidden.fill_noise(&hide, noise_std, rng);

    let region = region_seg(&hidden, position, size, scale)?;
    let candidates = CandidateDictionary::sample(&region, width, height, stride)?;
    Ok(candidates.atoms())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::rng::SimpleRng;

    #[test]
    fn test_negative_count_and_shape() {
        let frame = Frame::filled(50, 50, [40.0, 40.0, 40.0]);
        let mut rng = SimpleRng::new(5);
        let neg = sample_negatives(
            &frame,
            &Vector2::new(20.0, 20.0),
            &Vector2::new(10.0, 10.0),
            &Vector2::new(3.0, 3.0),
            Stride::new(10, 10),
            122.0,
            &mut rng,
        )
        .unwrap();
        // region [10, 38] -> 29 pixels, windows at 0 and 10 per axis
        assert_eq!(neg.nrows(), 300);
        assert_eq!(neg.ncols(), 4);
    }

    #[test]
    fn test_target_is_hidden() {
        let frame = Frame::from_fn(50, 50, |x, y| {
            if (20..30).contains(&x) && (20..30).contains(&y) {
                [200.0, 10.0, 10.0]
            } else {
                [40.0, 40.0, 40.0]
            }
        });
        let mut rng = SimpleRng::new(5);
        let neg = sample_negatives(
            &frame,
            &Vector2::new(20.0, 20.0),
            &Vector2::new(10.0, 10.0),
            &Vector2::new(3.0, 3.0),
            Stride::new(1, 1),
            122.0,
            &mut rng,
        )
        .unwrap();
        let target = frame.patch(&Window::new(20, 20, 10, 10)).unwrap();
        for j in 0..neg.ncols() {
            assert_ne!(neg.column(j).into_owned(), target, "window {} kept the target", j);
        }
    }

    #[test]
    fn test_source_frame_untouched() {
        let frame = Frame::filled(30, 30, [1.0, 2.0, 3.0]);
        let before = frame.clone();
        let mut rng = SimpleRng::new(1);
        sample_negatives(
            &frame,
            &Vector2::new(10.0, 10.0),
            &Vector2::new(5.0, 5.0),
            &Vector2::new(2.0, 2.0),
            Stride::new(2, 2),
            122.0,
            &mut rng,
        )
        .unwrap();
        assert_eq!(frame, before);
    }
}
