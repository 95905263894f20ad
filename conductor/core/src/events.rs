//! Surface Events
//!
//! Events sent from UI surfaces to the Conductor. Surfaces forward what the
//! user did; the Conductor decides what it means.

use serde::{Deserialize, Serialize};

/// Events from UI Surface to Conductor
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum SurfaceEvent {
    /// Surface connected and wants the current state
    Connected,

    /// The user edited the draft in the input box
    InputChanged {
        /// Full draft text after the edit
        text: String,
    },

    /// The user submitted the draft (Enter or the send affordance)
    Submit {
        /// The submitted text, untrimmed
        content: String,
    },

    /// User requested quit
    QuitRequested,
}
