use crate::library::Track;

use super::jitter::jitter;
use super::{PlacedTrack, tag_rotation};

const EPSILON: f64 = 1e-9;

/// Axis-aligned box in wall percent.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Zone {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Zone {
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Same box with `left <= right` and `top <= bottom`.
    pub fn normalized(self) -> Self {
        Self {
            left: self.left.min(self.right),
            top: self.top.min(self.bottom),
            right: self.left.max(self.right),
            bottom: self.top.max(self.bottom),
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn grown(self, dx: f64, dy: f64) -> Self {
        Self::new(self.left - dx, self.top - dy, self.right + dx, self.bottom + dy)
    }

    /// Inclusive containment.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left - EPSILON
            && x <= self.right + EPSILON
            && y >= self.top - EPSILON
            && y <= self.bottom + EPSILON
    }
}

/// Upper-left, upper-right, mid-left, mid-right, lower-left, lower-right.
pub const WIDE_ZONES: [Zone; 6] = [
    Zone::new(8.0, 12.0, 40.0, 38.0),
    Zone::new(60.0, 12.0, 92.0, 38.0),
    Zone::new(8.0, 42.0, 40.0, 68.0),
    Zone::new(60.0, 42.0, 92.0, 68.0),
    Zone::new(8.0, 70.0, 40.0, 92.0),
    Zone::new(60.0, 70.0, 92.0, 92.0),
];

/// Maps the canonical track list to wall coordinates.
pub trait PlacementStrategy: Sync {
    fn place(&self, tracks: &[Track]) -> Vec<PlacedTrack>;

    /// Box the track at `index` (of `count`) is guaranteed to land in,
    /// jitter included.
    fn declared_bounds(&self, index: usize, count: usize) -> Zone;
}

fn placed(track: &Track, original_index: usize, x: f64, y: f64) -> PlacedTrack {
    PlacedTrack {
        track: track.clone(),
        computed_x: x,
        computed_y: y,
        original_index,
        rotation: tag_rotation(&track.id),
    }
}

/// Round-robin the list over fixed zones, then spread each zone's bucket on
/// a near-square grid.
#[derive(Debug)]
pub struct ZoneScatter {
    pub zones: &'static [Zone],
    pub spread: f64,
    pub salt_x: &'static str,
    pub salt_y: &'static str,
}

impl ZoneScatter {
    fn scatter(&self, bucket: &[(usize, &Track)], zone: Zone, out: &mut Vec<PlacedTrack>) {
        let n = bucket.len();
        if n == 0 {
            return;
        }

        let cols = (n as f64).sqrt().ceil() as usize;
        let rows = n.div_ceil(cols);
        let zone = zone.normalized();

        for (i, (idx, t)) in bucket.iter().enumerate() {
            let c = i % cols;
            let r = i / cols;
            let gx = if cols == 1 {
                0.5
            } else {
                c as f64 / (cols - 1) as f64
            };
            let gy = if rows == 1 {
                0.5
            } else {
                r as f64 / (rows - 1) as f64
            };
            let x = zone.left + gx * zone.width() + jitter(&t.id, self.salt_x, self.spread);
            let y = zone.top + gy * zone.height() + jitter(&t.id, self.salt_y, self.spread);
            out.push(placed(t, *idx, x, y));
        }
    }
}

impl PlacementStrategy for ZoneScatter {
    fn place(&self, tracks: &[Track]) -> Vec<PlacedTrack> {
        if self.zones.is_empty() {
            return Vec::new();
        }

        let mut buckets: Vec<Vec<(usize, &Track)>> = vec![Vec::new(); self.zones.len()];
        for (idx, t) in tracks.iter().enumerate() {
            buckets[idx % self.zones.len()].push((idx, t));
        }

        let mut out = Vec::with_capacity(tracks.len());
        for (zone, bucket) in self.zones.iter().zip(&buckets) {
            self.scatter(bucket, *zone, &mut out);
        }
        out
    }

    fn declared_bounds(&self, index: usize, _count: usize) -> Zone {
        match self.zones.len() {
            0 => Zone::new(0.0, 0.0, 100.0, 100.0),
            n => self.zones[index % n]
                .normalized()
                .grown(self.spread, self.spread),
        }
    }
}

/// Wrapping grid with a fixed column count and alternating horizontal bands.
#[derive(Debug)]
pub struct BandGrid {
    pub columns: usize,
    pub bands: [f64; 2],
    pub spread_x: f64,
    pub spread_y: f64,
    pub salt_x: &'static str,
    pub salt_y: &'static str,
}

impl BandGrid {
    fn gap(&self) -> f64 {
        100.0 / (self.columns + 1) as f64
    }
}

impl PlacementStrategy for BandGrid {
    fn place(&self, tracks: &[Track]) -> Vec<PlacedTrack> {
        let columns = self.columns.max(1);
        let gap = self.gap();

        tracks
            .iter()
            .enumerate()
            .map(|(idx, t)| {
                let col = idx % columns;
                let band = (idx / columns) % self.bands.len();
                let x = gap * (col + 1) as f64 + jitter(&t.id, self.salt_x, self.spread_x);
                let y = self.bands[band] + jitter(&t.id, self.salt_y, self.spread_y);
                placed(t, idx, x, y)
            })
            .collect()
    }

    fn declared_bounds(&self, _index: usize, _count: usize) -> Zone {
        let gap = self.gap();
        let top = self.bands[0].min(self.bands[1]);
        let bottom = self.bands[0].max(self.bands[1]);
        Zone::new(gap, top, gap * self.columns.max(1) as f64, bottom)
            .grown(self.spread_x, self.spread_y)
    }
}

/// One centered column. The step shrinks when the list would run past
/// `bottom`; a lone track sits in the middle of the column.
#[derive(Debug)]
pub struct Stack {
    pub x: f64,
    pub top: f64,
    pub bottom: f64,
    pub step: f64,
}

impl PlacementStrategy for Stack {
    fn place(&self, tracks: &[Track]) -> Vec<PlacedTrack> {
        let n = tracks.len();
        if n == 1 {
            let mid = (self.top + self.bottom) / 2.0;
            return vec![placed(&tracks[0], 0, self.x, mid)];
        }

        let step = if n > 1 {
            self.step.min((self.bottom - self.top) / (n - 1) as f64)
        } else {
            self.step
        };

        tracks
            .iter()
            .enumerate()
            .map(|(idx, t)| placed(t, idx, self.x, self.top + idx as f64 * step))
            .collect()
    }

    fn declared_bounds(&self, _index: usize, _count: usize) -> Zone {
        Zone::new(self.x, self.top, self.x, self.bottom)
    }
}
