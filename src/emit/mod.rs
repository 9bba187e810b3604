//! Python source emission.
//!
//! Pure text generation from the resolved specification: helpers for
//! docstrings, methods and classes, the feature-class layout, and the
//! modules of a generated test package.

mod class;
mod module;
mod text;

pub use class::{
    BASE_TEST_CASE, BDD_TESTER, SCENARIO_DECORATOR, base_method_stub, class_bases,
    class_preamble, class_signature, render_feature_class, scenario_method, step_stub,
};
pub use module::{
    ALIASES_MODULE, BASE_MODULE, BASE_TEST_CASE_CLASS, render_aliases_module, render_base_module,
    render_stories_module,
};
pub use text::{INDENT, indent, make_class, make_doc, make_method, normalize};
