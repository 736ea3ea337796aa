/// Data layer: presets, request building, and response normalisation.
///
/// Architecture:
/// ```text
///   level 1-4            .tab file
///       │                    │
///       ▼                    │
///   ┌──────────┐             │
///   │  preset   │  fixed catalog → FilterPreset
///   └──────────┘             │
///       │                    │
///       ▼                    ▼
///   ┌──────────────────────────┐
///   │  request                  │  validate + freeze → UploadRequest
///   └──────────────────────────┘
///                │
///          (transport)
///                │
///                ▼
///   ┌──────────┐
///   │ response  │  raw JSON → spectrum + conclusion string
///   └──────────┘
/// ```

pub mod model;
pub mod preset;
pub mod request;
pub mod response;
