/*!
# Galaxy 3D Portal

Seamless portals for the Galaxy 3D engine.

Pairs of linked planar surfaces that show what lies beyond their partner and
relocate bodies crossing them, keeping pose and velocity continuous.

## Architecture

- **PortalManager**: owns portals and travelers, runs the per-frame sweeps
- **Portal**: crossing detection, traveler hand-off, recursive rendering
- **Traveler**: contract for relocatable bodies (rigid bodies, players)
- **Camera**: frustum culling, screen-space overlap, oblique projection
- **Renderer**: host-side collaborator (render targets, draws, materials)

The host renderer implements `Renderer`; the core never submits GPU work
itself.
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod math;
pub mod camera;
pub mod renderer;
pub mod traveler;
pub mod portal;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Galaxy3dError, Galaxy3dResult, Error, Result};

    // Engine singleton (logger slot)
    pub use crate::engine::Engine;

    // Frame driver
    pub use crate::portal::PortalManager;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Transform algebra
    pub mod math {
        pub use crate::math::*;
    }

    // Cameras, visibility and projection
    pub mod camera {
        pub use crate::camera::*;
    }

    // Host renderer contract
    pub mod render {
        pub use crate::renderer::*;
    }

    // Travelers
    pub mod traveler {
        pub use crate::traveler::*;
    }

    // Portals
    pub mod portal {
        pub use crate::portal::*;
    }
}

// Re-export math library at crate root
pub use glam;
