//! Level descriptors and the level pack
//!
//! Levels arrive as plain rectangle tables (built in, or JSON). On load every
//! rectangle is validated and tagged with the world it belongs to, so the
//! simulation never re-derives membership from coordinates.

use std::fmt;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::rect::Rect;

/// Canvas size; the two worlds split it at half height
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub width: f32,
    pub height: f32,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            width: crate::consts::CANVAS_WIDTH,
            height: crate::consts::CANVAS_HEIGHT,
        }
    }
}

impl Layout {
    /// The vertical coordinate separating upper and lower worlds
    #[inline]
    pub fn partition(&self) -> f32 {
        self.height / 2.0
    }

    fn is_well_formed(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Which of the two parallel layouts something lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum World {
    /// Normal world, above the partition line
    Upper,
    /// Glitched world, below the partition line
    Lower,
}

impl World {
    /// World membership by top edge
    pub fn of_y(y: f32, layout: &Layout) -> Self {
        if y < layout.partition() {
            World::Upper
        } else {
            World::Lower
        }
    }

    /// A body whose `y` exceeds this has fallen out of its world
    pub fn lower_bound(self, layout: &Layout) -> f32 {
        match self {
            World::Upper => layout.partition(),
            World::Lower => layout.height,
        }
    }
}

impl fmt::Display for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            World::Upper => f.write_str("upper"),
            World::Lower => f.write_str("lower"),
        }
    }
}

/// A platform or obstacle with its world resolved at load time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tagged {
    pub rect: Rect,
    pub world: World,
}

/// Errors raised when loading level data
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level pack contains no levels")]
    Empty,
    #[error("layout must have finite, positive width and height")]
    InvalidLayout,
    #[error("level {level}: missing {world} exit")]
    MissingExit { level: usize, world: World },
    #[error("level {level}: {kind} {index} has non-finite or non-positive size")]
    MalformedRect {
        level: usize,
        kind: &'static str,
        index: usize,
    },
    #[error("level {level}: {kind} {index} straddles the partition line")]
    StraddlesPartition {
        level: usize,
        kind: &'static str,
        index: usize,
    },
    #[error("level {level}: {expected} exit lies in the other world")]
    ExitInWrongWorld { level: usize, expected: World },
    #[error("level {level}: {expected} spawn lies outside its world")]
    SpawnInWrongWorld { level: usize, expected: World },
    #[error("malformed level json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Unvalidated level as authored
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelData {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub platforms: Vec<Rect>,
    #[serde(default)]
    pub obstacles: Vec<Rect>,
    #[serde(default)]
    pub exit_upper: Option<Rect>,
    #[serde(default)]
    pub exit_lower: Option<Rect>,
    #[serde(default)]
    pub spawn_upper: Option<Vec2>,
    #[serde(default)]
    pub spawn_lower: Option<Vec2>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LevelPackData {
    levels: Vec<LevelData>,
}

/// One validated, immutable level
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelDescriptor {
    name: Option<String>,
    platforms: Vec<Tagged>,
    obstacles: Vec<Tagged>,
    exit_upper: Rect,
    exit_lower: Rect,
    spawn_upper: Vec2,
    spawn_lower: Vec2,
}

impl LevelDescriptor {
    /// Validate authored data and tag every rectangle with its world.
    /// `level` is the 1-based index used in error messages.
    pub fn build(data: LevelData, layout: &Layout, level: usize) -> Result<Self, LevelError> {
        let platforms = tag_all(&data.platforms, layout, level, "platform")?;
        let obstacles = tag_all(&data.obstacles, layout, level, "obstacle")?;

        let exit_upper = validate_exit(data.exit_upper, World::Upper, layout, level)?;
        let exit_lower = validate_exit(data.exit_lower, World::Lower, layout, level)?;

        let spawn_upper = data.spawn_upper.unwrap_or(default_spawn(World::Upper, layout));
        let spawn_lower = data.spawn_lower.unwrap_or(default_spawn(World::Lower, layout));
        for (spawn, world) in [(spawn_upper, World::Upper), (spawn_lower, World::Lower)] {
            if !spawn.is_finite() || World::of_y(spawn.y, layout) != world {
                return Err(LevelError::SpawnInWrongWorld {
                    level,
                    expected: world,
                });
            }
        }

        Ok(Self {
            name: data.name,
            platforms,
            obstacles,
            exit_upper,
            exit_lower,
            spawn_upper,
            spawn_lower,
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn platforms(&self) -> &[Tagged] {
        &self.platforms
    }

    pub fn obstacles(&self) -> &[Tagged] {
        &self.obstacles
    }

    pub fn exit(&self, world: World) -> &Rect {
        match world {
            World::Upper => &self.exit_upper,
            World::Lower => &self.exit_lower,
        }
    }

    /// Top-left start position of the character in `world`
    pub fn spawn(&self, world: World) -> Vec2 {
        match world {
            World::Upper => self.spawn_upper,
            World::Lower => self.spawn_lower,
        }
    }

    /// Platforms belonging to one world, in list order
    pub fn platforms_in(&self, world: World) -> impl Iterator<Item = &Rect> {
        self.platforms
            .iter()
            .filter(move |p| p.world == world)
            .map(|p| &p.rect)
    }

    /// Obstacles belonging to one world, in list order
    pub fn obstacles_in(&self, world: World) -> impl Iterator<Item = &Rect> {
        self.obstacles
            .iter()
            .filter(move |o| o.world == world)
            .map(|o| &o.rect)
    }
}

fn default_spawn(world: World, layout: &Layout) -> Vec2 {
    Vec2::new(50.0, world.lower_bound(layout) - 100.0)
}

fn tag_all(
    rects: &[Rect],
    layout: &Layout,
    level: usize,
    kind: &'static str,
) -> Result<Vec<Tagged>, LevelError> {
    rects
        .iter()
        .enumerate()
        .map(|(index, rect)| {
            if !rect.is_well_formed() {
                return Err(LevelError::MalformedRect { level, kind, index });
            }
            let partition = layout.partition();
            if rect.y < partition && rect.bottom() > partition {
                return Err(LevelError::StraddlesPartition { level, kind, index });
            }
            Ok(Tagged {
                rect: *rect,
                world: World::of_y(rect.y, layout),
            })
        })
        .collect()
}

fn validate_exit(
    exit: Option<Rect>,
    world: World,
    layout: &Layout,
    level: usize,
) -> Result<Rect, LevelError> {
    let exit = exit.ok_or(LevelError::MissingExit { level, world })?;
    let tagged = tag_all(std::slice::from_ref(&exit), layout, level, "exit")?;
    if tagged[0].world != world {
        return Err(LevelError::ExitInWrongWorld {
            level,
            expected: world,
        });
    }
    Ok(exit)
}

/// Ordered, non-empty level pack indexed from 1, with the layout it was
/// validated against
#[derive(Debug, Clone, PartialEq)]
pub struct LevelSet {
    levels: Vec<LevelDescriptor>,
    layout: Layout,
}

impl LevelSet {
    pub fn from_data(levels: Vec<LevelData>, layout: &Layout) -> Result<Self, LevelError> {
        if !layout.is_well_formed() {
            return Err(LevelError::InvalidLayout);
        }
        if levels.is_empty() {
            return Err(LevelError::Empty);
        }
        let levels = levels
            .into_iter()
            .enumerate()
            .map(|(i, data)| LevelDescriptor::build(data, layout, i + 1))
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!("Loaded {} levels", levels.len());
        Ok(Self {
            levels,
            layout: *layout,
        })
    }

    /// Parse a `{"levels": [...]}` pack
    pub fn from_json(json: &str, layout: &Layout) -> Result<Self, LevelError> {
        let pack: LevelPackData = serde_json::from_str(json)?;
        Self::from_data(pack.levels, layout)
    }

    pub fn from_json_file(path: &Path, layout: &Layout) -> Result<Self, LevelError> {
        let json = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json, layout)
    }

    /// The three stock levels (Tutorial, Challenge, Expert)
    pub fn builtin(layout: &Layout) -> Result<Self, LevelError> {
        Self::from_data(builtin_levels(layout), layout)
    }

    /// Level by 1-based index
    pub fn get(&self, index: usize) -> Option<&LevelDescriptor> {
        index.checked_sub(1).and_then(|i| self.levels.get(i))
    }

    /// Level by 1-based index; callers keep the index within `1..=len()`
    pub(crate) fn at(&self, index: usize) -> &LevelDescriptor {
        &self.levels[index - 1]
    }

    /// Canvas layout every level in the pack was tagged against
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelDescriptor> {
        self.levels.iter()
    }
}

/// Stock geometry, expressed relative to the partition (`w`) and canvas
/// bottom (`h`) so it follows the layout
fn builtin_levels(layout: &Layout) -> Vec<LevelData> {
    let w = layout.partition();
    let h = layout.height;
    let r = Rect::new;
    let exits = |data: LevelData| LevelData {
        exit_upper: Some(r(750.0, w - 40.0, 30.0, 40.0)),
        exit_lower: Some(r(750.0, h - 40.0, 30.0, 40.0)),
        ..data
    };

    vec![
        exits(LevelData {
            name: Some("Tutorial".into()),
            platforms: vec![
                r(0.0, w - 20.0, 800.0, 20.0),
                r(200.0, w - 80.0, 100.0, 20.0),
                r(400.0, w - 120.0, 100.0, 20.0),
                r(600.0, w - 60.0, 100.0, 20.0),
                r(0.0, h - 20.0, 800.0, 20.0),
                r(150.0, h - 100.0, 100.0, 20.0),
                r(350.0, h - 140.0, 100.0, 20.0),
                r(550.0, h - 80.0, 100.0, 20.0),
            ],
            obstacles: vec![r(300.0, w - 40.0, 20.0, 40.0), r(250.0, h - 40.0, 20.0, 40.0)],
            ..Default::default()
        }),
        exits(LevelData {
            name: Some("Challenge".into()),
            platforms: vec![
                r(0.0, w - 20.0, 800.0, 20.0),
                r(100.0, w - 60.0, 80.0, 20.0),
                r(250.0, w - 100.0, 80.0, 20.0),
                r(400.0, w - 140.0, 80.0, 20.0),
                r(550.0, w - 80.0, 80.0, 20.0),
                r(700.0, w - 120.0, 80.0, 20.0),
                r(0.0, h - 20.0, 800.0, 20.0),
                r(150.0, h - 80.0, 80.0, 20.0),
                r(300.0, h - 120.0, 80.0, 20.0),
                r(450.0, h - 60.0, 80.0, 20.0),
                r(600.0, h - 100.0, 80.0, 20.0),
            ],
            obstacles: vec![
                r(200.0, w - 40.0, 20.0, 40.0),
                r(500.0, w - 40.0, 20.0, 40.0),
                r(350.0, h - 40.0, 20.0, 40.0),
            ],
            ..Default::default()
        }),
        exits(LevelData {
            name: Some("Expert".into()),
            platforms: vec![
                r(0.0, w - 20.0, 800.0, 20.0),
                r(50.0, w - 60.0, 60.0, 20.0),
                r(180.0, w - 100.0, 60.0, 20.0),
                r(310.0, w - 140.0, 60.0, 20.0),
                r(440.0, w - 100.0, 60.0, 20.0),
                r(570.0, w - 60.0, 60.0, 20.0),
                r(700.0, w - 100.0, 60.0, 20.0),
                r(0.0, h - 20.0, 800.0, 20.0),
                r(120.0, h - 80.0, 60.0, 20.0),
                r(250.0, h - 120.0, 60.0, 20.0),
                r(380.0, h - 60.0, 60.0, 20.0),
                r(510.0, h - 100.0, 60.0, 20.0),
                r(640.0, h - 80.0, 60.0, 20.0),
            ],
            obstacles: vec![
                r(150.0, w - 40.0, 20.0, 40.0),
                r(400.0, w - 40.0, 20.0, 40.0),
                r(650.0, w - 40.0, 20.0, 40.0),
                r(200.0, h - 40.0, 20.0, 40.0),
                r(450.0, h - 40.0, 20.0, 40.0),
            ],
            ..Default::default()
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> Layout {
        Layout::default()
    }

    fn minimal() -> LevelData {
        LevelData {
            platforms: vec![Rect::new(0.0, 280.0, 800.0, 20.0)],
            exit_upper: Some(Rect::new(750.0, 260.0, 30.0, 40.0)),
            exit_lower: Some(Rect::new(750.0, 560.0, 30.0, 40.0)),
            ..Default::default()
        }
    }

    #[test]
    fn test_builtin_pack() {
        let set = LevelSet::builtin(&layout()).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(*set.layout(), layout());
        assert!(set.get(0).is_none());
        assert!(set.get(4).is_none());

        let first = set.get(1).unwrap();
        assert_eq!(first.name(), Some("Tutorial"));
        assert_eq!(first.platforms_in(World::Upper).count(), 4);
        assert_eq!(first.platforms_in(World::Lower).count(), 4);
        assert_eq!(first.obstacles_in(World::Upper).count(), 1);
        assert_eq!(first.spawn(World::Upper), Vec2::new(50.0, 200.0));
        assert_eq!(first.spawn(World::Lower), Vec2::new(50.0, 500.0));
        assert_eq!(set.get(3).unwrap().obstacles_in(World::Lower).count(), 2);
    }

    #[test]
    fn test_world_tag_at_partition() {
        let l = layout();
        assert_eq!(World::of_y(299.9, &l), World::Upper);
        assert_eq!(World::of_y(300.0, &l), World::Lower);
        assert_eq!(World::Upper.lower_bound(&l), 300.0);
        assert_eq!(World::Lower.lower_bound(&l), 600.0);
    }

    #[test]
    fn test_missing_exit_rejected() {
        let data = LevelData {
            exit_lower: None,
            ..minimal()
        };
        let err = LevelSet::from_data(vec![data], &layout()).unwrap_err();
        assert!(matches!(
            err,
            LevelError::MissingExit {
                level: 1,
                world: World::Lower
            }
        ));
        assert_eq!(err.to_string(), "level 1: missing lower exit");
    }

    #[test]
    fn test_exit_in_wrong_world_rejected() {
        let data = LevelData {
            exit_upper: Some(Rect::new(750.0, 560.0, 30.0, 40.0)),
            ..minimal()
        };
        let err = LevelSet::from_data(vec![minimal(), data], &layout()).unwrap_err();
        assert!(matches!(
            err,
            LevelError::ExitInWrongWorld {
                level: 2,
                expected: World::Upper
            }
        ));
    }

    #[test]
    fn test_straddling_platform_rejected() {
        let mut data = minimal();
        data.platforms.push(Rect::new(100.0, 290.0, 50.0, 20.0));
        let err = LevelSet::from_data(vec![data], &layout()).unwrap_err();
        assert!(matches!(
            err,
            LevelError::StraddlesPartition {
                kind: "platform",
                index: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_malformed_obstacle_rejected() {
        let mut data = minimal();
        data.obstacles.push(Rect::new(100.0, 100.0, 0.0, 20.0));
        let err = LevelSet::from_data(vec![data], &layout()).unwrap_err();
        assert!(matches!(
            err,
            LevelError::MalformedRect {
                kind: "obstacle",
                ..
            }
        ));
    }

    #[test]
    fn test_spawn_in_wrong_world_rejected() {
        let data = LevelData {
            spawn_lower: Some(Vec2::new(50.0, 100.0)),
            ..minimal()
        };
        let err = LevelSet::from_data(vec![data], &layout()).unwrap_err();
        assert!(matches!(
            err,
            LevelError::SpawnInWrongWorld {
                expected: World::Lower,
                ..
            }
        ));
    }

    #[test]
    fn test_empty_pack_and_bad_layout() {
        assert!(matches!(
            LevelSet::from_data(Vec::new(), &layout()),
            Err(LevelError::Empty)
        ));
        let bad = Layout {
            width: 0.0,
            height: 600.0,
        };
        assert!(matches!(
            LevelSet::from_data(vec![minimal()], &bad),
            Err(LevelError::InvalidLayout)
        ));
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "levels": [{
                "name": "Flat",
                "platforms": [
                    {"x": 0, "y": 280, "width": 800, "height": 20},
                    {"x": 0, "y": 580, "width": 800, "height": 20}
                ],
                "obstacles": [{"x": 300, "y": 560, "width": 20, "height": 20}],
                "exit_upper": {"x": 750, "y": 260, "width": 30, "height": 40},
                "exit_lower": {"x": 750, "y": 560, "width": 30, "height": 40},
                "spawn_upper": [10, 100]
            }]
        }"#;
        let set = LevelSet::from_json(json, &layout()).unwrap();
        let level = set.get(1).unwrap();
        assert_eq!(level.name(), Some("Flat"));
        assert_eq!(level.spawn(World::Upper), Vec2::new(10.0, 100.0));
        assert_eq!(level.spawn(World::Lower), Vec2::new(50.0, 500.0));
        assert_eq!(level.obstacles()[0].world, World::Lower);
    }

    #[test]
    fn test_bad_json() {
        let err = LevelSet::from_json("{\"levels\": 3}", &layout()).unwrap_err();
        assert!(matches!(err, LevelError::Json(_)));
        let err =
            LevelSet::from_json_file(Path::new("/nonexistent/levels.json"), &layout()).unwrap_err();
        assert!(matches!(err, LevelError::Io { .. }));
    }
}
