//! Per-app table of shape classes, consulted when creating and loading shapes.

use serde_json::Value;

use super::{BoxProps, DotProps, DrawProps, EllipseProps, PolygonProps, SerializedShape, Shape, ShapeKind, StarProps};
use crate::error::{EditorError, Result};
use crate::point::Point;

/// A creatable shape type: its `type` tag and the props new instances start with.
#[derive(Debug, Clone, Copy)]
pub struct ShapeClass {
    id: &'static str,
    defaults: fn() -> ShapeKind,
}

fn box_defaults() -> ShapeKind {
    ShapeKind::Box(BoxProps::default())
}

fn ellipse_defaults() -> ShapeKind {
    ShapeKind::Ellipse(EllipseProps::default())
}

fn dot_defaults() -> ShapeKind {
    ShapeKind::Dot(DotProps::default())
}

fn polygon_defaults() -> ShapeKind {
    ShapeKind::Polygon(PolygonProps::default())
}

fn star_defaults() -> ShapeKind {
    ShapeKind::Star(StarProps::default())
}

fn draw_defaults() -> ShapeKind {
    ShapeKind::Draw(DrawProps::default())
}

impl ShapeClass {
    pub const BOX: Self = Self { id: "box", defaults: box_defaults };
    pub const ELLIPSE: Self = Self { id: "ellipse", defaults: ellipse_defaults };
    pub const DOT: Self = Self { id: "dot", defaults: dot_defaults };
    pub const POLYGON: Self = Self { id: "polygon", defaults: polygon_defaults };
    pub const STAR: Self = Self { id: "star", defaults: star_defaults };
    pub const DRAW: Self = Self { id: "draw", defaults: draw_defaults };

    pub const BUILTIN: [Self; 6] = [Self::BOX, Self::ELLIPSE, Self::DOT, Self::POLYGON, Self::STAR, Self::DRAW];

    /// Same type tag, different starting props.
    #[must_use]
    pub fn with_defaults(self, defaults: fn() -> ShapeKind) -> Self {
        Self { defaults, ..self }
    }

    #[must_use]
    pub fn id(&self) -> &'static str {
        self.id
    }

    #[must_use]
    pub fn defaults(&self) -> ShapeKind {
        (self.defaults)()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ShapeRegistry {
    classes: Vec<ShapeClass>,
}

impl ShapeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for class in ShapeClass::BUILTIN {
            registry.register(class);
        }
        registry
    }

    /// Add a class, replacing any class with the same id.
    pub fn register(&mut self, class: ShapeClass) {
        let kind_tag = class.defaults().type_name();
        if kind_tag != class.id {
            tracing::warn!(class = class.id, kind = kind_tag, "shape class defaults carry a different type tag");
        }
        self.classes.retain(|c| c.id != class.id);
        self.classes.push(class);
    }

    /// Remove a class. Returns whether it was registered.
    pub fn deregister(&mut self, id: &str) -> bool {
        let before = self.classes.len();
        self.classes.retain(|c| c.id != id);
        before != self.classes.len()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.classes.iter().any(|c| c.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.classes.iter().map(|c| c.id)
    }

    /// Look up a class by type tag.
    ///
    /// # Errors
    ///
    /// [`EditorError::MissingShapeType`] for an empty tag,
    /// [`EditorError::NoShapeClass`] for an unregistered one.
    pub fn get(&self, type_name: &str) -> Result<&ShapeClass> {
        if type_name.is_empty() {
            return Err(EditorError::MissingShapeType);
        }
        self.classes
            .iter()
            .find(|c| c.id == type_name)
            .ok_or_else(|| EditorError::NoShapeClass(type_name.to_owned()))
    }

    /// Instantiate a registered class with its default props.
    ///
    /// # Errors
    ///
    /// Fails when `type_name` is not registered.
    pub fn create(&self, type_name: &str, id: impl Into<String>, parent_id: impl Into<String>, point: Point) -> Result<Shape> {
        let class = self.get(type_name)?;
        Ok(Shape::new(id, parent_id, point, class.defaults()))
    }

    /// Check that a record's type is registered before it is instantiated.
    ///
    /// # Errors
    ///
    /// Fails when the record's type is not registered.
    pub fn check(&self, record: &SerializedShape) -> Result<()> {
        self.get(record.kind.type_name()).map(|_| ())
    }

    /// Build a shape from an untyped JSON record.
    ///
    /// # Errors
    ///
    /// Fails when the record has no `type`, names an unregistered class, or
    /// does not match that class's props.
    pub fn deserialize(&self, value: Value) -> Result<Shape> {
        let type_name = value.get("type").and_then(Value::as_str).ok_or(EditorError::MissingShapeType)?;
        self.get(type_name)?;
        let record: SerializedShape = serde_json::from_value(value)?;
        Ok(Shape::from_serialized(record))
    }
}
