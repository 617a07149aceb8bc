//! Submitting a new study area.

use crate::{status_error, ApiArgs, RectangleArgs};
use ftm_core::geometry::{DrawnShape, GeometryCapture, LatLng};
use ftm_core::request::{AreaRequestBuilder, FormState};
use log::{info, warn};
use std::time::Duration;

/// Capture a rectangle from corner arguments, the way the map widget would
/// report a freshly drawn one.
fn capture_rectangle(rectangle: RectangleArgs) -> anyhow::Result<GeometryCapture> {
    let shape = DrawnShape::rectangle(
        LatLng::new(rectangle.south, rectangle.west),
        LatLng::new(rectangle.north, rectangle.east),
    )?;
    let mut capture = GeometryCapture::default();
    capture.on_shape_created(shape);
    Ok(capture)
}

/// Validate the form, then submit it to the backend.
pub async fn run_create(
    api: &ApiArgs,
    form: FormState,
    rectangle: RectangleArgs,
    submit_delay: Option<Duration>,
) -> anyhow::Result<()> {
    let capture = capture_rectangle(rectangle)?;

    let mut builder = AreaRequestBuilder::new();
    if let Some(delay) = submit_delay {
        builder = builder.with_submit_delay(delay);
    }
    let request = builder
        .build(&form, capture.current_bounding_box())
        .map_err(|e| anyhow::anyhow!("{}: {}", e.field(), e))?;

    match capture.estimate_sample_count(request.sampling_distance_meters()) {
        Ok(count) => info!(
            "Area {} covers roughly {} sampling points at {} m spacing",
            request.name(),
            count,
            request.sampling_distance_meters()
        ),
        Err(e) => warn!("Could not estimate sample count: {}", e),
    }

    let client = api.client()?;
    println!("Sending data to: {}", client.endpoint(&["api", "create"]));
    let response = builder
        .submit(&client, &request)
        .await
        .map_err(status_error)?;
    println!("Data sent successfully\nServer Response: {}", response.summary());
    Ok(())
}

/// Print the sample-count estimate for a rectangle.
pub fn run_estimate(rectangle: RectangleArgs, distance: f64) -> anyhow::Result<()> {
    let capture = capture_rectangle(rectangle)?;
    let count = capture.estimate_sample_count(distance)?;
    println!("{}", count);
    Ok(())
}
