use image::{GrayImage, Luma, RgbImage};
use crate::{traits::Denoiser, types::Channel};

/// Median filter over a square window, applied per channel
#[derive(Debug, Clone)]
pub struct MedianDenoiser {
    /// Window extent in pixels (odd)
    pub window: u32,
}

impl Default for MedianDenoiser {
    fn default() -> Self {
        Self { window: 9 }
    }
}

impl Denoiser for MedianDenoiser {
    fn denoise(&self, image: &RgbImage) -> RgbImage {
        let radius = self.window / 2;
        if radius == 0 {
            return image.clone();
        }
        imageproc::filter::median_filter(image, radius, radius)
    }
}

/// Isolate one color channel as an intensity plane
pub fn extract_channel_plane(image: &RgbImage, channel: Channel) -> GrayImage {
    let c = channel.index();
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        Luma([image.get_pixel(x, y)[c]])
    })
}
