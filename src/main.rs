use anyhow::Context;
use fits_raster_rs::image_pipeline::{
    CfaPattern, DecodeConfig, ImageMetadata, PixelLayout, RasterPipeline, SampleType,
};
use fits_raster_rs::logger;

use tracing::{error, info};

const WIDTH: usize = 640;
const HEIGHT: usize = 480;

/// Synthetic 16-bit RGGB frame: a horizontal red ramp, a vertical blue ramp
/// and flat green, stored big-endian with the usual BZERO offset.
fn synthetic_rggb_frame() -> Vec<u8> {
    let mut bytes = Vec::with_capacity(WIDTH * HEIGHT * 2);
    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            let unsigned = match (x & 1, y & 1) {
                (0, 0) => x * 65535 / (WIDTH - 1),
                (1, 1) => y * 65535 / (HEIGHT - 1),
                _ => 32768,
            };
            let stored = (unsigned as i32 - 32768) as i16;
            bytes.extend_from_slice(&stored.to_be_bytes());
        }
    }
    bytes
}

fn main() -> anyhow::Result<()> {
    logger::init();

    info!("Starting fits_raster...");

    let config = DecodeConfig::builder()
        .layout(PixelLayout::Argb)
        .max_dimension(Some(32768))
        .build();
    let pipeline = RasterPipeline::new(config).context("creating decode pipeline")?;

    info!("Raster pipeline initialized");
    info!("Worker threads: {}", pipeline.threads());
    info!("Output layout: {}", pipeline.config().layout);

    let metadata = ImageMetadata::new(WIDTH, HEIGHT, 1, SampleType::from_bitpix(16)?)
        .with_scaling(32768.0, 1.0)
        .with_cfa(CfaPattern::from_bayerpat("'RGGB    '").context("parsing BAYERPAT")?);
    let bytes = synthetic_rggb_frame();

    match pipeline.decode(&metadata, &bytes) {
        Ok(frame) => {
            let image = frame
                .into_interleaved()
                .context("expected an interleaved frame")?;
            let format = image.format();
            info!(
                width = image.width,
                height = image.height,
                layout = %format.layout,
                bits_per_pixel = format.bits_per_pixel,
                "Decode successful!"
            );
            info!("Centre pixel: {:?}", image.pixel(WIDTH / 2, HEIGHT / 2));
        }
        Err(e) => error!("Decode failed: {}", e),
    }

    Ok(())
}
