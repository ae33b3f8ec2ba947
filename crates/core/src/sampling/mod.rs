pub mod frame_observation;
pub mod frame_sampler;
pub mod frame_sequencer;
