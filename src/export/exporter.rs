use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::debug;
use serde::Serialize;

use super::SpriteSink;
use crate::error::SplitError;
use crate::progress::{NoProgress, Progress, ProgressSink};
use crate::raster::Raster;
use crate::scan::Component;

/// A sprite delivered to the sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportedSprite {
    pub name: String,
    pub bounds: Component,
}

/// Output name of the `index`-th sprite (1-based)
pub fn sprite_name(base_name: &str, index: usize) -> String {
    format!("{}_{}.png", base_name, index)
}

/// Crop every component out of `raster` and hand it to `sink`.
///
/// Sprites are named `{base_name}_{i}.png` with `i` counting from 1 in
/// component order. See [`Exporter::export`] for failure semantics.
pub fn export(
    raster: &Raster<'_>,
    components: &[Component],
    sink: &mut dyn SpriteSink,
    base_name: &str,
) -> Result<Vec<ExportedSprite>, SplitError> {
    Exporter::new(base_name).export(raster, components, sink, &mut NoProgress)
}

/// Export configuration with progress reporting and cancellation
#[derive(Debug, Clone)]
pub struct Exporter {
    base_name: String,
    cancel_token: Option<Arc<AtomicBool>>,
}

impl Exporter {
    pub fn new(base_name: impl Into<String>) -> Self {
        Self {
            base_name: base_name.into(),
            cancel_token: None,
        }
    }

    /// Abort before the next sprite once `token` is set
    pub fn cancel_token(mut self, token: Arc<AtomicBool>) -> Self {
        self.cancel_token = Some(token);
        self
    }

    /// Export all components in order.
    ///
    /// The first failing sprite stops the batch and is reported as
    /// [`SplitError::Export`] with its index and name. Sprites delivered
    /// before the failure stay delivered.
    pub fn export(
        &self,
        raster: &Raster<'_>,
        components: &[Component],
        sink: &mut dyn SpriteSink,
        progress: &mut dyn ProgressSink,
    ) -> Result<Vec<ExportedSprite>, SplitError> {
        let total = components.len();
        let mut exported = Vec::with_capacity(total);

        for (i, &bounds) in components.iter().enumerate() {
            let index = i + 1;
            if self.cancel_requested() {
                return Err(SplitError::Cancelled);
            }

            progress.report(&Progress::Saving {
                current: index,
                total,
            });

            let name = sprite_name(&self.base_name, index);
            if let Err(e) = raster
                .crop(bounds)
                .and_then(|sprite| sink.write_sprite(&name, &sprite))
            {
                return Err(SplitError::Export {
                    index,
                    name,
                    source: Box::new(e),
                });
            }

            debug!(
                "Saved {} (x:{}, y:{}, w:{}, h:{})",
                name, bounds.x, bounds.y, bounds.width, bounds.height
            );
            exported.push(ExportedSprite { name, bounds });
        }

        progress.report(&Progress::Done);
        Ok(exported)
    }

    fn cancel_requested(&self) -> bool {
        self.cancel_token
            .as_ref()
            .is_some_and(|token| token.load(Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::MemorySink;
    use crate::scan::scan;
    use image::{Rgba, RgbaImage};
    use std::path::PathBuf;

    /// Two 2x2 sprites with distinct colors, separated by 3 transparent columns
    fn two_sprite_atlas() -> RgbaImage {
        let mut img = RgbaImage::new(7, 3);
        for y in 0..2 {
            for x in 0..2 {
                img.put_pixel(x, y, Rgba([255, 0, 0, 255]));
                img.put_pixel(x + 5, y + 1, Rgba([0, 0, 255, 128]));
            }
        }
        img
    }

    /// Fails on the n-th delivery (1-based)
    struct FailingSink {
        fail_at: usize,
        delivered: Vec<String>,
    }

    impl SpriteSink for FailingSink {
        fn write_sprite(&mut self, name: &str, _sprite: &RgbaImage) -> Result<(), SplitError> {
            if self.delivered.len() + 1 == self.fail_at {
                return Err(SplitError::OutputWrite {
                    path: PathBuf::from(name),
                    source: std::io::Error::other("disk full"),
                });
            }
            self.delivered.push(name.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_sprite_name() {
        assert_eq!(sprite_name("atlas", 1), "atlas_1.png");
        assert_eq!(sprite_name("hero sheet", 12), "hero sheet_12.png");
    }

    #[test]
    fn test_export_crops_in_order() {
        let img = two_sprite_atlas();
        let raster = Raster::from_image(&img).unwrap();
        let components = scan(&raster, 2);
        let mut sink = MemorySink::new();

        let exported = export(&raster, &components, &mut sink, "atlas").unwrap();

        assert_eq!(exported.len(), 2);
        assert_eq!(exported[0].name, "atlas_1.png");
        assert_eq!(exported[0].bounds, Component::new(0, 0, 2, 2));
        assert_eq!(exported[1].name, "atlas_2.png");
        assert_eq!(exported[1].bounds, Component::new(5, 1, 2, 2));

        let sprites = sink.into_sprites();
        assert_eq!(sprites[0].1, RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255])));
        assert_eq!(sprites[1].1, RgbaImage::from_pixel(2, 2, Rgba([0, 0, 255, 128])));
    }

    #[test]
    fn test_export_progress_sequence() {
        let img = two_sprite_atlas();
        let raster = Raster::from_image(&img).unwrap();
        let components = scan(&raster, 1);
        let mut events = Vec::new();

        Exporter::new("atlas")
            .export(
                &raster,
                &components,
                &mut MemorySink::new(),
                &mut |e: &Progress| events.push(e.clone()),
            )
            .unwrap();

        assert_eq!(
            events,
            vec![
                Progress::Saving {
                    current: 1,
                    total: 2
                },
                Progress::Saving {
                    current: 2,
                    total: 2
                },
                Progress::Done,
            ]
        );
    }

    #[test]
    fn test_sink_failure_stops_batch() {
        let img = two_sprite_atlas();
        let raster = Raster::from_image(&img).unwrap();
        let components = vec![
            Component::new(0, 0, 2, 2),
            Component::new(5, 1, 2, 2),
            Component::new(0, 0, 1, 1),
        ];
        let mut sink = FailingSink {
            fail_at: 2,
            delivered: Vec::new(),
        };

        let err = export(&raster, &components, &mut sink, "atlas").unwrap_err();

        match err {
            SplitError::Export { index, name, source } => {
                assert_eq!(index, 2);
                assert_eq!(name, "atlas_2.png");
                assert!(matches!(*source, SplitError::OutputWrite { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
        // Earlier export is not rolled back, later ones never run
        assert_eq!(sink.delivered, ["atlas_1.png"]);
    }

    #[test]
    fn test_out_of_bounds_component_is_attributed() {
        let img = RgbaImage::new(2, 2);
        let raster = Raster::from_image(&img).unwrap();
        let components = [Component::new(1, 1, 2, 2)];

        let err = export(&raster, &components, &mut MemorySink::new(), "x").unwrap_err();
        assert!(matches!(err, SplitError::Export { index: 1, .. }));
    }

    #[test]
    fn test_cancel_before_export() {
        let img = two_sprite_atlas();
        let raster = Raster::from_image(&img).unwrap();
        let components = scan(&raster, 1);
        let mut sink = MemorySink::new();

        let result = Exporter::new("atlas")
            .cancel_token(Arc::new(AtomicBool::new(true)))
            .export(&raster, &components, &mut sink, &mut NoProgress);

        assert!(matches!(result, Err(SplitError::Cancelled)));
        assert!(sink.sprites().is_empty());
    }

    #[test]
    fn test_empty_component_list() {
        let img = RgbaImage::new(4, 4);
        let raster = Raster::from_image(&img).unwrap();
        let mut events = Vec::new();

        let exported = Exporter::new("atlas")
            .export(
                &raster,
                &[],
                &mut MemorySink::new(),
                &mut |e: &Progress| events.push(e.clone()),
            )
            .unwrap();

        assert!(exported.is_empty());
        assert_eq!(events, vec![Progress::Done]);
    }
}
