use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::Result;

/// Opaque key-value metadata passed through to the generator untouched.
pub type GenerationMeta = BTreeMap<String, Value>;

/// A pluggable text-generation capability: one prompt in, one text out.
///
/// The control loop never looks inside an implementation. Errors are handed
/// back to the caller of the loop exactly as returned here.
pub trait Generator {
    fn generate(&mut self, prompt: &str, meta: &GenerationMeta) -> Result<String>;
}

impl<G: Generator + ?Sized> Generator for Box<G> {
    fn generate(&mut self, prompt: &str, meta: &GenerationMeta) -> Result<String> {
        (**self).generate(prompt, meta)
    }
}

impl<G: Generator + ?Sized> Generator for &mut G {
    fn generate(&mut self, prompt: &str, meta: &GenerationMeta) -> Result<String> {
        (**self).generate(prompt, meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenerationError;
    use serde_json::json;

    /// Records the metadata it was handed so tests can check pass-through.
    struct MetaRecorder {
        seen: Vec<GenerationMeta>,
    }

    impl Generator for MetaRecorder {
        fn generate(&mut self, prompt: &str, meta: &GenerationMeta) -> Result<String> {
            self.seen.push(meta.clone());
            if prompt.is_empty() {
                return Err(GenerationError::Other("empty prompt".into()));
            }
            Ok(prompt.to_uppercase())
        }
    }

    #[test]
    fn test_boxed_generator_delegates() {
        let mut boxed: Box<dyn Generator> = Box::new(MetaRecorder { seen: Vec::new() });
        let out = boxed.generate("hello", &GenerationMeta::new()).unwrap();
        assert_eq!(out, "HELLO");
    }

    #[test]
    fn test_mut_ref_generator_passes_meta_through() {
        let mut recorder = MetaRecorder { seen: Vec::new() };
        let meta = GenerationMeta::from([
            ("temperature".to_string(), json!(0.2)),
            ("user".to_string(), json!("abc")),
        ]);
        fn call_owned<G: Generator>(mut generator: G, meta: &GenerationMeta) -> String {
            generator.generate("x", meta).unwrap()
        }
        assert_eq!(call_owned(&mut recorder, &meta), "X");
        assert_eq!(recorder.seen, vec![meta]);
    }

    #[test]
    fn test_errors_surface_unchanged() {
        let mut recorder = MetaRecorder { seen: Vec::new() };
        let err = recorder.generate("", &GenerationMeta::new()).unwrap_err();
        assert_eq!(err, GenerationError::Other("empty prompt".into()));
    }
}
