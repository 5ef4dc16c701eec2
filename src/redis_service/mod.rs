pub mod redis_emitter;
