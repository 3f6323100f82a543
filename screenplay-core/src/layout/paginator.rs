use super::measure::HeightMeasurer;
use super::style::{ElementStyle, StyleResolver};
use crate::config::PageGeometryConfig;
use crate::errors::PaginationError;
use crate::types::*;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Pages and break markers for one element sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    pub available_height: f32,
    pub pages: Vec<Page>,
    pub breaks: Vec<PageBreakMarker>,
}

impl Pagination {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Ordered element and page-break sequence for the rendering layer
    pub fn items(&self) -> Vec<LayoutItem> {
        let mut items = Vec::new();
        for page in &self.pages {
            if page.number > 1 {
                if let Some(&first) = page.element_indices.first() {
                    items.push(LayoutItem::PageBreak(PageBreakMarker {
                        page_number: page.number,
                        before_element: first,
                    }));
                }
            }
            items.extend(
                page.element_indices
                    .iter()
                    .map(|&index| LayoutItem::Element { index }),
            );
        }
        items
    }

    /// Page number an element landed on
    pub fn page_of(&self, element_index: usize) -> Option<u32> {
        self.pages
            .iter()
            .find(|page| page.element_indices.contains(&element_index))
            .map(|page| page.number)
    }
}

/// Greedy, element-granular paginator over pre-measured heights.
///
/// Elements are never split. One that overflows the current page opens the
/// next one; one taller than a whole page sits alone and overflows it.
#[derive(Debug, Clone)]
pub struct Paginator {
    available_height: f32,
}

impl Paginator {
    pub fn new(available_height: f32) -> Self {
        Self { available_height }
    }

    pub fn from_geometry(geometry: &PageGeometryConfig) -> Self {
        Self::new(geometry.available_height())
    }

    pub fn available_height(&self) -> f32 {
        self.available_height
    }

    /// Resolve styles, measure against them, then paginate
    pub fn layout(
        &self,
        elements: &[ScreenplayElement],
        resolver: &dyn StyleResolver,
        measurer: &dyn HeightMeasurer,
    ) -> Result<Pagination, PaginationError> {
        let styles: Vec<ElementStyle> = elements
            .iter()
            .map(|element| resolver.style_of(element.element_type))
            .collect();

        let heights: Vec<Option<f32>> = elements
            .iter()
            .zip(&styles)
            .map(|(element, style)| measurer.height_of(element, style))
            .collect();

        self.paginate(elements, &heights)
    }

    /// Paginate with one optional measurement per element
    pub fn paginate(
        &self,
        elements: &[ScreenplayElement],
        heights: &[Option<f32>],
    ) -> Result<Pagination, PaginationError> {
        if heights.len() != elements.len() {
            return Err(PaginationError::MeasurementCountMismatch {
                expected: elements.len(),
                actual: heights.len(),
            });
        }

        let measured = elements
            .iter()
            .zip(heights)
            .enumerate()
            .map(|(index, (element, height))| {
                height.ok_or(PaginationError::MeasurementUnavailable {
                    index,
                    element_type: element.element_type,
                })
            })
            .collect::<Result<Vec<f32>, _>>()?;

        self.paginate_heights(&measured)
    }

    /// Paginate bare heights, one per element in order
    pub fn paginate_heights(&self, heights: &[f32]) -> Result<Pagination, PaginationError> {
        let mut pages = Vec::new();
        let mut breaks = Vec::new();
        let mut current = Page::new(1);

        for (index, &height) in heights.iter().enumerate() {
            if !height.is_finite() || height < 0.0 {
                return Err(PaginationError::InvalidMeasurement { index, height });
            }

            let overflows = current.used_height + height > self.available_height;
            if overflows && !current.is_empty() {
                let marker = PageBreakMarker {
                    page_number: current.number + 1,
                    before_element: index,
                };
                debug!(
                    "   page break before element {} ({:.1} + {:.1} > {:.1})",
                    index, current.used_height, height, self.available_height
                );
                let next = Page::new(marker.page_number);
                pages.push(std::mem::replace(&mut current, next));
                breaks.push(marker);
            }

            current.element_indices.push(index);
            current.used_height += height;
        }
        pages.push(current);

        info!(
            "📄 Paginated {} elements onto {} pages ({:.0}px usable per page)",
            heights.len(),
            pages.len(),
            self.available_height
        );

        Ok(Pagination {
            available_height: self.available_height,
            pages,
            breaks,
        })
    }
}
