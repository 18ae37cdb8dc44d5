//! One generic record transform, in place of a wrapper type per collection flavour.
//!
//! A [`Stage`] turns one input into zero or more outputs. The three adapters
//! cover the shapes a data-parallel runtime asks for: map (exactly one output),
//! filter (the input or nothing) and flat map (any number of outputs).

use super::error::EngineError;
use std::marker::PhantomData;

pub trait Stage<I>: Sync {
    type Output: Send;

    fn name(&self) -> &'static str;

    fn apply(&self, input: &I) -> Result<Vec<Self::Output>, EngineError>;
}

/// One input, one output.
pub struct MapStage<I, O, F> {
    name: &'static str,
    f: F,
    _marker: PhantomData<fn(&I) -> O>,
}

impl<I, O, F> MapStage<I, O, F>
where
    F: Fn(&I) -> Result<O, EngineError> + Sync,
{
    pub fn new(name: &'static str, f: F) -> Self {
        Self {
            name,
            f,
            _marker: PhantomData,
        }
    }
}

impl<I, O, F> Stage<I> for MapStage<I, O, F>
where
    O: Send,
    F: Fn(&I) -> Result<O, EngineError> + Sync,
{
    type Output = O;

    fn name(&self) -> &'static str {
        self.name
    }

    fn apply(&self, input: &I) -> Result<Vec<O>, EngineError> {
        Ok(vec![(self.f)(input)?])
    }
}

/// Keeps the input when the predicate holds.
pub struct FilterStage<I, F> {
    name: &'static str,
    predicate: F,
    _marker: PhantomData<fn(&I)>,
}

impl<I, F> FilterStage<I, F>
where
    F: Fn(&I) -> Result<bool, EngineError> + Sync,
{
    pub fn new(name: &'static str, predicate: F) -> Self {
        Self {
            name,
            predicate,
            _marker: PhantomData,
        }
    }
}

impl<I, F> Stage<I> for FilterStage<I, F>
where
    I: Clone + Send,
    F: Fn(&I) -> Result<bool, EngineError> + Sync,
{
    type Output = I;

    fn name(&self) -> &'static str {
        self.name
    }

    fn apply(&self, input: &I) -> Result<Vec<I>, EngineError> {
        Ok(if (self.predicate)(input)? {
            vec![input.clone()]
        } else {
            Vec::new()
        })
    }
}

/// One input, any number of outputs.
pub struct FlatMapStage<I, O, F> {
    name: &'static str,
    f: F,
    _marker: PhantomData<fn(&I) -> O>,
}

impl<I, O, F> FlatMapStage<I, O, F>
where
    F: Fn(&I) -> Result<Vec<O>, EngineError> + Sync,
{
    pub fn new(name: &'static str, f: F) -> Self {
        Self {
            name,
            f,
            _marker: PhantomData,
        }
    }
}

impl<I, O, F> Stage<I> for FlatMapStage<I, O, F>
where
    O: Send,
    F: Fn(&I) -> Result<Vec<O>, EngineError> + Sync,
{
    type Output = O;

    fn name(&self) -> &'static str {
        self.name
    }

    fn apply(&self, input: &I) -> Result<Vec<O>, EngineError> {
        (self.f)(input)
    }
}
