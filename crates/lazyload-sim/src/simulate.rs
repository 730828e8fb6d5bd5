use crate::config::{SimConfig, SimError};
use crate::gallery::scan_dir;
use crate::page::{GalleryPage, Tile};
use lazyload_core::{ImageFetcher, LazyLoader, LoadOptions, PageElement};
use lazyload_image::DiskFetcher;
use lazyload_types::{JobEvent, PageEvent, Size};
use std::fmt;
use std::path::Path;
use tracing::{debug, info, warn};

/// Outcome of one pass over a gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub total: usize,
    pub loaded: usize,
    pub failed: usize,
    /// Tiles still queued when the run was torn down.
    pub never_visible: usize,
    /// Page events forwarded to the loader.
    pub sweeps: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} image(s): {} loaded, {} failed, {} never visible after {} sweep(s)",
            self.total, self.loaded, self.failed, self.never_visible, self.sweeps
        )
    }
}

fn tile_options() -> LoadOptions<Tile> {
    LoadOptions::new()
        .on_success(|tile: &Tile, src, elapsed| {
            info!("Loaded {} in {}ms", src, elapsed.as_millis());
            tile.apply(JobEvent::LoadComplete);
        })
        .on_error(|tile: &Tile, src, elapsed| {
            warn!("Failed to load {} after {}ms", src, elapsed.as_millis());
            tile.apply(JobEvent::LoadError(src.to_string()));
        })
}

/// Marks tiles the loader has handed to the fetcher. After a sweep every
/// visible tile has left the queue.
fn mark_promoted<F: ImageFetcher>(loader: &LazyLoader<GalleryPage, F, Tile>, tiles: &[Tile]) {
    let Some(snapshot) = loader.snapshot() else {
        return;
    };

    for tile in tiles {
        if tile.state().is_queued() && snapshot.is_visible(&tile.bounds()) {
            debug!("Tile {} promoted: {}", tile.index(), tile.src());
            tile.apply(JobEvent::Promoted);
        }
    }
}

/// Lays the images in `dir` out as a grid and scrolls through it one viewport
/// at a time, forwarding page events to a [`LazyLoader`] until nothing is
/// left queued or the end of the document is reached.
///
/// Must run inside a [`tokio::task::LocalSet`].
pub async fn simulate(dir: &Path, config: &SimConfig) -> Result<Summary, SimError> {
    config.validate()?;

    let names = scan_dir(dir).map_err(|source| SimError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut layout = config.layout.clone();
    let page = GalleryPage::new(Size::new(layout.container_width, layout.viewport_height));
    let fetcher = DiskFetcher::new(dir, config.loader.cache_capacity);
    let loader = LazyLoader::new(page, fetcher, config.loader.clone());

    let tiles: Vec<Tile> = names
        .iter()
        .enumerate()
        .map(|(index, name)| Tile::new(index, format!("/{}", name), layout.cell_bounds(index)))
        .collect();

    let (columns, rows) = layout.grid_dimensions(tiles.len());
    info!(
        "Simulating {} image(s) from {} in a {}x{} grid",
        tiles.len(),
        dir.display(),
        columns,
        rows
    );

    for tile in &tiles {
        loader.register(tile.clone(), tile_options());
    }
    mark_promoted(&loader, &tiles);
    loader.settle().await;

    let mut sweeps = 0;
    let mut resized = false;

    while loader.pending() > 0 {
        let top = loader.page().scroll_top();
        if top + layout.viewport_height >= layout.document_height(tiles.len()) {
            debug!("Reached the end of the gallery at {}px", top);
            break;
        }

        loader.page().scroll_to(top + layout.viewport_height);
        loader.handle_event(PageEvent::Scroll);
        sweeps += 1;
        mark_promoted(&loader, &tiles);

        if let (false, Some(width)) = (resized, config.resize_width) {
            resized = true;
            layout = layout.with_container_width(width);
            for tile in &tiles {
                tile.relayout(layout.cell_bounds(tile.index()));
            }

            info!("Resizing gallery to {}px wide", width);
            loader
                .page()
                .resize(Size::new(layout.container_width, layout.viewport_height));
            loader.handle_event(PageEvent::Resize);
            sweeps += 1;
            mark_promoted(&loader, &tiles);
        }

        loader.settle().await;
    }

    loader.settle().await;
    let never_visible = loader.teardown();

    let summary = Summary {
        total: tiles.len(),
        loaded: tiles.iter().filter(|tile| tile.state().is_loaded()).count(),
        failed: tiles.iter().filter(|tile| tile.state().is_failed()).count(),
        never_visible,
        sweeps,
    };

    info!("{}", summary);
    Ok(summary)
}
