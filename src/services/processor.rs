use pixop_engine::{engine, ImageBuffer};
use std::sync::Arc;
use std::time::Instant;

use crate::error::ProcessError;
use crate::models::Recipe;

/// Runs recipes over image buffers.
pub struct BatchProcessor;

impl BatchProcessor {
    /// Apply every step of `recipe` to `image`, in order and in place.
    ///
    /// Steps that change geometry replace the buffer.
    pub fn apply(recipe: &Recipe, mut image: ImageBuffer) -> Result<ImageBuffer, ProcessError> {
        let started = Instant::now();

        for (index, step) in recipe.steps.iter().enumerate() {
            let step_started = Instant::now();
            let mut op = step.build();
            engine::run_in_place(&mut op, &mut image)?;
            tracing::debug!(
                index,
                op = step.name(),
                width = image.width(),
                height = image.height(),
                elapsed_us = step_started.elapsed().as_micros() as u64,
                "Applied step"
            );
        }

        tracing::info!(
            recipe = recipe.display_name(),
            steps = recipe.steps.len(),
            width = image.width(),
            height = image.height(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Recipe applied"
        );
        Ok(image)
    }

    /// Same as [`apply`](Self::apply), on tokio's blocking pool.
    ///
    /// Transforms are CPU-bound; running them here keeps the async runtime
    /// responsive.
    pub async fn apply_blocking(
        recipe: Arc<Recipe>,
        image: ImageBuffer,
    ) -> Result<ImageBuffer, ProcessError> {
        tokio::task::spawn_blocking(move || Self::apply(&recipe, image))
            .await
            .map_err(|e| ProcessError::Worker(format!("Recipe task failed: {e}")))?
    }

    /// Run `recipe` over several buffers concurrently, results in input order.
    pub async fn apply_batch(
        recipe: Arc<Recipe>,
        images: Vec<ImageBuffer>,
    ) -> Result<Vec<ImageBuffer>, ProcessError> {
        let mut set = tokio::task::JoinSet::new();
        for (index, image) in images.into_iter().enumerate() {
            let recipe = recipe.clone();
            set.spawn(async move { (index, Self::apply_blocking(recipe, image).await) });
        }

        let mut results = Vec::with_capacity(set.len());
        while let Some(joined) = set.join_next().await {
            let (index, result) =
                joined.map_err(|e| ProcessError::Worker(format!("Batch task failed: {e}")))?;
            results.push((index, result?));
        }
        results.sort_by_key(|(index, _)| *index);
        Ok(results.into_iter().map(|(_, image)| image).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Step;

    #[test]
    fn test_empty_recipe_is_identity() {
        let image = ImageBuffer::filled(3, 3, true, &[1, 2, 3, 4]).unwrap();
        let recipe = Recipe {
            name: None,
            steps: Vec::new(),
        };
        let out = BatchProcessor::apply(&recipe, image.clone()).unwrap();
        assert_eq!(out, image);
    }

    #[test]
    fn test_steps_run_in_order() {
        let image = ImageBuffer::filled(2, 2, false, &[200, 200, 200]).unwrap();
        // Posterize then invert: 200 -> 255 -> 0
        let recipe = Recipe {
            name: Some("order".into()),
            steps: vec![Step::Posterize { levels: 2 }, Step::Invert],
        };
        let out = BatchProcessor::apply(&recipe, image).unwrap();
        assert!(out.iter_pixels().all(|p| p == [0, 0, 0]));
    }
}
