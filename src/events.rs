//! Change notifications.
//!
//! Subscribers receive events over `std::sync::mpsc` channels. Dropped
//! receivers are pruned on the next emit.

use std::sync::mpsc::{channel, Receiver, Sender};

use crate::render::FrameStats;
use crate::state::{GroupId, PlotIndex};

/// Something changed in the plot model or the pipeline
#[derive(Clone, Debug, PartialEq)]
pub enum PlotEvent {
    PlotAdded(PlotIndex),
    PlotRemoved(PlotIndex),
    /// Aggregate change after a batch operation
    PlotsChanged,
    SelectionChanged(PlotIndex),
    GroupSelectionChanged(GroupId),
    VisibilityChanged { index: PlotIndex, visible: bool },
    PropertiesChanged(PlotIndex),
    /// A rebuild completed and the surface should be redrawn
    RenderReady(FrameStats),
}

impl PlotEvent {
    /// Whether this event should trigger a full cull + rebuild
    pub fn needs_rebuild(&self) -> bool {
        !matches!(self, Self::RenderReady(_))
    }
}

/// Fan-out list of event subscribers
#[derive(Debug, Default)]
pub struct EventHub {
    subscribers: Vec<Sender<PlotEvent>>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber
    pub fn subscribe(&mut self) -> Receiver<PlotEvent> {
        let (sender, receiver) = channel();
        self.subscribers.push(sender);
        receiver
    }

    /// Deliver `event` to every live subscriber
    pub fn emit(&mut self, event: PlotEvent) {
        self.subscribers
            .retain(|sender| sender.send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
