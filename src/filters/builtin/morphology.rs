//! Morphological operators: Erosion, Dilation, Opening and Closing.
//!
//! Erosion takes the infimum and dilation the supremum of the snapshot over
//! the structuring element. Offsets that land outside the buffer are skipped.

use crate::core::buffer::PixelBuffer;
use crate::core::element::StructuringElement;
use crate::core::error::{ImagingError, ImagingResult};
use crate::core::filter::{Category, Filter, FilterMetadata, KernelSize};
use crate::core::params::{Constraint, FilterParams, ParameterDefinition};
use crate::core::types::{ParamType, Value};
use crate::filters::builtin::smoothing::kernel_size_parameter;
use crate::filters::registry::FilterRegistry;

/// Register morphological operators.
pub fn register(registry: &mut FilterRegistry) {
    registry.register(|p| Ok(Erosion::with_element(element_from_params(p)?)));
    registry.register(|p| Ok(Dilation::with_element(element_from_params(p)?)));
    registry.register(|p| Ok(Opening::with_element(element_from_params(p)?)));
    registry.register(|p| Ok(Closing::with_element(element_from_params(p)?)));
}

/// Build the structuring element described by `element`, `kernel_size` and `radius`.
fn element_from_params(params: &FilterParams) -> ImagingResult<StructuringElement> {
    match params.string("element")? {
        "square" => square_element(params.integer("kernel_size")?),
        "disk" => StructuringElement::disk(params.float("radius")?),
        "cross" => Ok(StructuringElement::cross()),
        other => Err(ImagingError::invalid_parameter(
            "element",
            other,
            "expected square, disk or cross",
        )),
    }
}

/// Square element covering an odd `kernel_size` window.
fn square_element(kernel_size: i64) -> ImagingResult<StructuringElement> {
    let kernel = KernelSize::new(kernel_size)?;
    let radius =
        u32::try_from(kernel.radius()).map_err(|_| ImagingError::InvalidKernelSize(kernel_size))?;
    StructuringElement::square(radius)
}

fn morphology_metadata(id: &str, name: &str, description: &str) -> FilterMetadata {
    FilterMetadata::builder(id, name)
        .description(description)
        .category(Category::Morphology)
        .parameter(
            ParameterDefinition::new("element", ParamType::String, Value::from("square"))
                .with_description("Structuring element shape")
                .with_constraint(Constraint::OneOf(vec![
                    "square".to_string(),
                    "disk".to_string(),
                    "cross".to_string(),
                ])),
        )
        .parameter(kernel_size_parameter(3))
        .parameter(
            ParameterDefinition::new("radius", ParamType::Float, Value::Float(1.0))
                .with_description("Disk radius, used when element is disk")
                .with_constraint(Constraint::NonNegative),
        )
        .tags(["morphology", "structuring element"])
        .build()
}

/// Which lattice bound a pass selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extremum {
    /// Infimum, starting from 255.
    Min,
    /// Supremum, starting from 0.
    Max,
}

impl Extremum {
    fn identity(self) -> f64 {
        match self {
            Extremum::Min => 255.0,
            Extremum::Max => 0.0,
        }
    }

    #[inline]
    fn pick(self, acc: f64, v: f64) -> f64 {
        match self {
            Extremum::Min if v < acc => v,
            Extremum::Max if v > acc => v,
            _ => acc,
        }
    }
}

/// One erosion or dilation pass over every channel.
pub fn morphological_pass(
    buffer: &mut PixelBuffer,
    element: &StructuringElement,
    extremum: Extremum,
) {
    let source = buffer.clone();
    let offsets = element.offsets();
    buffer.fill_with(|y, x, c| {
        offsets
            .iter()
            .filter_map(|&(dx, dy)| source.offset(y, x, dy as isize, dx as isize))
            .fold(extremum.identity(), |acc, (ny, nx)| {
                extremum.pick(acc, source.at(ny, nx, c))
            })
    });
}

fn describe(operation: &str, element: &StructuringElement) -> String {
    format!("{} ({} offsets, radius {})", operation, element.len(), element.radius())
}

macro_rules! morphology_constructors {
    ($ty:ident) => {
        impl $ty {
            /// Square element covering an odd `kernel_size` window.
            pub fn new(kernel_size: i64) -> ImagingResult<Self> {
                Ok(Self::with_element(square_element(kernel_size)?))
            }

            /// Any structuring element.
            pub fn with_element(element: StructuringElement) -> Self {
                Self { element }
            }

            /// The structuring element.
            pub fn element(&self) -> &StructuringElement {
                &self.element
            }
        }

        impl Default for $ty {
            fn default() -> Self {
                Self::with_element(StructuringElement::default())
            }
        }
    };
}

/// Local minimum over the structuring element.
#[derive(Debug, Clone)]
pub struct Erosion {
    element: StructuringElement,
}

morphology_constructors!(Erosion);

impl Filter for Erosion {
    fn metadata(&self) -> FilterMetadata {
        morphology_metadata(
            "erosion",
            "Erosion",
            "Shrink bright regions: minimum over the structuring element",
        )
    }

    fn name(&self) -> String {
        describe("Erosion", &self.element)
    }

    fn apply(&self, buffer: &mut PixelBuffer) -> ImagingResult<()> {
        log::debug!("{} on {}x{}", self.name(), buffer.width(), buffer.height());
        morphological_pass(buffer, &self.element, Extremum::Min);
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn Filter> {
        Box::new(self.clone())
    }
}

/// Local maximum over the structuring element.
#[derive(Debug, Clone)]
pub struct Dilation {
    element: StructuringElement,
}

morphology_constructors!(Dilation);

impl Filter for Dilation {
    fn metadata(&self) -> FilterMetadata {
        morphology_metadata(
            "dilation",
            "Dilation",
            "Grow bright regions: maximum over the structuring element",
        )
    }

    fn name(&self) -> String {
        describe("Dilation", &self.element)
    }

    fn apply(&self, buffer: &mut PixelBuffer) -> ImagingResult<()> {
        log::debug!("{} on {}x{}", self.name(), buffer.width(), buffer.height());
        morphological_pass(buffer, &self.element, Extremum::Max);
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn Filter> {
        Box::new(self.clone())
    }
}

/// Erosion followed by dilation with the same element.
#[derive(Debug, Clone)]
pub struct Opening {
    element: StructuringElement,
}

morphology_constructors!(Opening);

impl Filter for Opening {
    fn metadata(&self) -> FilterMetadata {
        morphology_metadata(
            "opening",
            "Opening",
            "Remove bright details smaller than the element",
        )
    }

    fn name(&self) -> String {
        describe("Opening", &self.element)
    }

    fn apply(&self, buffer: &mut PixelBuffer) -> ImagingResult<()> {
        log::debug!("{} on {}x{}", self.name(), buffer.width(), buffer.height());
        log::trace!("opening: erosion");
        morphological_pass(buffer, &self.element, Extremum::Min);
        log::trace!("opening: dilation");
        morphological_pass(buffer, &self.element, Extremum::Max);
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn Filter> {
        Box::new(self.clone())
    }
}

/// Dilation followed by erosion with the same element.
#[derive(Debug, Clone)]
pub struct Closing {
    element: StructuringElement,
}

morphology_constructors!(Closing);

impl Filter for Closing {
    fn metadata(&self) -> FilterMetadata {
        morphology_metadata(
            "closing",
            "Closing",
            "Fill dark details smaller than the element",
        )
    }

    fn name(&self) -> String {
        describe("Closing", &self.element)
    }

    fn apply(&self, buffer: &mut PixelBuffer) -> ImagingResult<()> {
        log::debug!("{} on {}x{}", self.name(), buffer.width(), buffer.height());
        log::trace!("closing: dilation");
        morphological_pass(buffer, &self.element, Extremum::Max);
        log::trace!("closing: erosion");
        morphological_pass(buffer, &self.element, Extremum::Min);
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn Filter> {
        Box::new(self.clone())
    }
}
