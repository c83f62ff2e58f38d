use std::time::Duration;

use minifb::{Key, Scale, Window, WindowOptions};
use tracing::info;

use crate::error::Result;
use crate::Film;

// about 60 fps
const FRAME_TIME: Duration = Duration::from_micros(16_667);

/// shows a finished film, blocking until the window is closed or escape is pressed.
pub fn show(film: &Film<u32>, title: &str) -> Result<()> {
    let options = WindowOptions {
        scale: Scale::X1,
        ..WindowOptions::default()
    };
    let mut window = Window::new(title, film.width, film.height, options)?;
    window.limit_update_rate(Some(FRAME_TIME));
    info!(width = film.width, height = film.height, "opened plot window");

    while window.is_open() && !window.is_key_down(Key::Escape) {
        window.update_with_buffer(&film.buffer, film.width, film.height)?;
    }
    info!("plot window closed");
    Ok(())
}
