use std::path::Path;

use tracing::{debug, info};

use crate::config::PlotConfig;
use crate::error::{Error, Result};
use crate::sim::{Classification, Simulation};
use crate::{rgb_to_u32, u32_to_rgb, Film};

// padding around the unit square, in plot units
const MARGIN: f64 = 0.05;
const VIEW_MIN: f64 = -MARGIN;
const VIEW_MAX: f64 = 1.0 + MARGIN;

const BOUNDARY_COLOR: u32 = 0x404040;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    pub inside: u32,
    pub outside: u32,
    pub background: u32,
}

impl Palette {
    pub fn color_of(&self, classification: Classification) -> u32 {
        match classification {
            Classification::Inside => self.inside,
            Classification::Outside => self.outside,
        }
    }
}

impl From<&PlotConfig> for Palette {
    fn from(config: &PlotConfig) -> Self {
        let [r, g, b] = config.inside_color;
        let inside = rgb_to_u32(r, g, b);
        let [r, g, b] = config.outside_color;
        let outside = rgb_to_u32(r, g, b);
        let [r, g, b] = config.background;
        let background = rgb_to_u32(r, g, b);
        Palette {
            inside,
            outside,
            background,
        }
    }
}

/// one scatter point, in plot units.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Marker {
    pub x: f64,
    pub y: f64,
    pub color: u32,
}

/// one marker per sample, in sample order.
pub fn markers(simulation: &Simulation, palette: &Palette) -> Vec<Marker> {
    simulation
        .samples()
        .iter()
        .map(|s| Marker {
            x: s.x,
            y: s.y,
            color: palette.color_of(s.classification),
        })
        .collect()
}

/// maps plot units to pixel coordinates, y up. none for points outside the view.
pub fn to_pixel(x: f64, y: f64, width: usize, height: usize) -> Option<(isize, isize)> {
    let view = VIEW_MIN..=VIEW_MAX;
    if !view.contains(&x) || !view.contains(&y) {
        return None;
    }
    let span = VIEW_MAX - VIEW_MIN;
    let u = (x - VIEW_MIN) / span;
    let v = (y - VIEW_MIN) / span;
    let px = (u * width as f64).floor() as isize;
    let py = height as isize - 1 - (v * height as f64).floor() as isize;
    Some((px, py))
}

pub fn fill_disc(film: &mut Film<u32>, cx: isize, cy: isize, radius: f32, color: u32) {
    if !(radius > 0.0) {
        return;
    }
    // nothing past the far edge of the film can be drawn anyway
    let radius = radius.min(film.width.max(film.height) as f32) as f64;
    let r = radius.ceil() as isize;
    let r2 = radius * radius;
    let x0 = cx.saturating_sub(r).max(0);
    let x1 = cx.saturating_add(r).min(film.width as isize - 1);
    let y0 = cy.saturating_sub(r).max(0);
    let y1 = cy.saturating_add(r).min(film.height as isize - 1);
    for y in y0..=y1 {
        for x in x0..=x1 {
            let (dx, dy) = (x as f64 - cx as f64, y as f64 - cy as f64);
            if dx * dx + dy * dy <= r2 {
                film.write_at(x, y, color);
            }
        }
    }
}

// traces x^2 + y^2 = 1 for x, y >= 0
fn draw_boundary(film: &mut Film<u32>, color: u32) {
    let (width, height) = (film.width, film.height);
    let approx_pixel_length = std::f64::consts::FRAC_PI_2 * width.max(height) as f64;
    let steps = (2.0 * approx_pixel_length).ceil() as usize;
    for i in 0..=steps {
        let phi = std::f64::consts::FRAC_PI_2 * i as f64 / steps as f64;
        let (sin, cos) = phi.sin_cos();
        if let Some((px, py)) = to_pixel(cos, sin, width, height) {
            film.write_at(px, py, color);
        }
    }
}

/// draws markers over the configured background. markers outside the view are skipped.
pub fn rasterize(
    markers: &[Marker],
    config: &PlotConfig,
    palette: &Palette,
) -> Result<Film<u32>> {
    config.validate()?;
    let mut film = Film::new(config.width, config.height, palette.background);
    if config.draw_boundary {
        draw_boundary(&mut film, BOUNDARY_COLOR);
    }
    for marker in markers {
        if let Some((px, py)) = to_pixel(marker.x, marker.y, film.width, film.height) {
            fill_disc(&mut film, px, py, config.point_radius, marker.color);
        }
    }
    Ok(film)
}

/// the whole scatter plot for a run.
pub fn render(simulation: &Simulation, config: &PlotConfig) -> Result<Film<u32>> {
    let palette = Palette::from(config);
    let markers = markers(simulation, &palette);
    debug!(
        markers = markers.len(),
        width = config.width,
        height = config.height,
        "rasterizing scatter plot"
    );
    rasterize(&markers, config, &palette)
}

pub fn save_png<P: AsRef<Path>>(film: &Film<u32>, path: P) -> Result<()> {
    let path = path.as_ref();
    let too_large = |_| {
        Error::InvalidInput(format!(
            "film of {}x{} is too large for a png",
            film.width, film.height
        ))
    };
    let width = u32::try_from(film.width).map_err(too_large)?;
    let height = u32::try_from(film.height).map_err(too_large)?;
    let image = image::RgbImage::from_fn(width, height, |x, y| {
        let (r, g, b) = u32_to_rgb(film.at(x as usize, y as usize));
        image::Rgb([r, g, b])
    });
    image.save(path)?;
    info!(path = %path.display(), "wrote scatter plot");
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sim::{from_points, run_seeded};

    fn small_config() -> PlotConfig {
        PlotConfig {
            width: 105,
            height: 105,
            point_radius: 1.0,
            ..PlotConfig::default()
        }
    }

    fn pixel(x: f64, y: f64) -> (usize, usize) {
        let (px, py) = to_pixel(x, y, 105, 105).unwrap();
        (px as usize, py as usize)
    }

    #[test]
    fn test_every_sample_marked_once() {
        let config = PlotConfig::default();
        let palette = Palette::from(&config);
        let sim = run_seeded(300, Some(99)).unwrap();
        let marks = markers(&sim, &palette);
        assert_eq!(marks.len(), sim.total());
        for (mark, sample) in marks.iter().zip(sim.samples()) {
            assert_eq!((mark.x, mark.y), (sample.x, sample.y));
            let expected = if sample.is_inside() {
                palette.inside
            } else {
                palette.outside
            };
            assert_eq!(mark.color, expected);
        }
        let red = marks.iter().filter(|m| m.color == 0xFF0000).count();
        assert_eq!(red, sim.inside_count());
    }

    #[test]
    fn test_to_pixel_orientation() {
        let (x0, y0) = to_pixel(0.0, 0.0, 110, 110).unwrap();
        let (x1, y1) = to_pixel(1.0 - 1e-9, 1.0 - 1e-9, 110, 110).unwrap();
        assert!(x0 < x1);
        // y grows upward on screen
        assert!(y0 > y1);
        assert!((0..110).contains(&x0) && (0..110).contains(&y0));
        assert_eq!(to_pixel(-1.0, 0.5, 110, 110), None);
        assert_eq!(to_pixel(0.5, f64::NAN, 110, 110), None);
        assert_eq!(to_pixel(f64::INFINITY, 0.5, 110, 110), None);
    }

    #[test]
    fn test_rasterize_colors() {
        let config = small_config();
        let palette = Palette::from(&config);
        let sim = from_points(vec![(0.25, 0.25), (0.9, 0.9)]).unwrap();
        let film = render(&sim, &config).unwrap();
        assert_eq!(film.buffer.len(), 105 * 105);

        let (px, py) = pixel(0.25, 0.25);
        assert_eq!(film.at(px, py), palette.inside);
        let (px, py) = pixel(0.9, 0.9);
        assert_eq!(film.at(px, py), palette.outside);
        assert_eq!(film.at(0, 0), palette.background);
    }

    #[test]
    fn test_far_off_points_are_skipped() {
        let config = small_config();
        let palette = Palette::from(&config);
        let sim = from_points(vec![
            (0.5, -1e300),
            (1e300, 0.5),
            (-1e300, 1e300),
            (f64::NAN, 0.5),
            (0.5, f64::INFINITY),
        ])
        .unwrap();
        assert_eq!(markers(&sim, &palette).len(), 5);
        let film = render(&sim, &config).unwrap();
        assert!(film.buffer.iter().all(|c| *c == palette.background));
    }

    #[test]
    fn test_fill_disc_stays_on_film() {
        let mut film = Film::new(16, 16, 0u32);
        fill_disc(&mut film, isize::MAX, isize::MIN, 3.0, 1);
        assert!(film.buffer.iter().all(|c| *c == 0));
        fill_disc(&mut film, 8, 8, f32::INFINITY, 1);
        assert!(film.buffer.iter().all(|c| *c == 1));
        fill_disc(&mut film, 8, 8, f32::NAN, 2);
        assert!(!film.buffer.contains(&2));
    }

    #[test]
    fn test_rasterize_rejects_bad_geometry() {
        let sim = from_points(vec![(0.5, 0.5)]).unwrap();
        let mut config = small_config();
        config.point_radius = f32::INFINITY;
        assert!(matches!(render(&sim, &config), Err(Error::InvalidInput(_))));
        config.point_radius = 1.0;
        config.width = usize::MAX;
        assert!(matches!(render(&sim, &config), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_boundary_drawn_only_when_asked() {
        let mut config = small_config();
        let sim = from_points(vec![(0.0, 0.0)]).unwrap();
        let plain = render(&sim, &config).unwrap();
        assert!(!plain.buffer.contains(&BOUNDARY_COLOR));
        config.draw_boundary = true;
        let with_arc = render(&sim, &config).unwrap();
        let (px, py) = pixel(1.0, 0.0);
        assert_eq!(with_arc.at(px, py), BOUNDARY_COLOR);
        let (px, py) = pixel(0.0, 1.0);
        assert_eq!(with_arc.at(px, py), BOUNDARY_COLOR);
    }

    #[test]
    fn test_save_png_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("samples.png");
        let config = small_config();
        let sim = from_points(vec![(0.25, 0.25), (0.9, 0.9)]).unwrap();
        let film = render(&sim, &config).unwrap();
        save_png(&film, &path).unwrap();

        let image = image::open(&path).unwrap().to_rgb8();
        assert_eq!(image.dimensions(), (105, 105));
        let (px, py) = pixel(0.25, 0.25);
        assert_eq!(image.get_pixel(px as u32, py as u32), &image::Rgb([255, 0, 0]));
        let (px, py) = pixel(0.9, 0.9);
        assert_eq!(image.get_pixel(px as u32, py as u32), &image::Rgb([0, 0, 255]));
        assert_eq!(image.get_pixel(0, 0), &image::Rgb([255, 255, 255]));
    }

    #[test]
    fn test_save_png_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("dir").join("samples.png");
        let film = Film::new(4, 4, 0u32);
        assert!(matches!(save_png(&film, &path), Err(Error::Image(_))));
    }

    #[test]
    fn test_palette_from_config() {
        let palette = Palette::from(&PlotConfig::default());
        assert_eq!(palette.inside, 0xFF0000);
        assert_eq!(palette.outside, 0x0000FF);
        assert_eq!(palette.background, 0xFFFFFF);
        assert_eq!(palette.color_of(Classification::Inside), palette.inside);
    }
}
