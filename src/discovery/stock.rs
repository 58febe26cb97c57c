// Sat Jan 24 2026 - Alex
//
// Recipes for the five internal routines the bridge intercepts. Hop counts
// and selections are tuned per VM family against observed binaries; treat
// them as data, not as something to simplify.

use crate::discovery::{FunctionRecipe, HopSelect};
use crate::pattern::SignatureDefinition;
use crate::versioning::MetadataVersion;

pub const CLASS_BY_NAME: &str = "class_by_name";
pub const CLASS_FROM_TYPEDEF_INDEX: &str = "class_from_typedef_index";
pub const CLASS_FROM_TYPE: &str = "class_from_type";
pub const FIELD_DEFAULT_VALUE: &str = "field_default_value";
pub const CLASS_INIT: &str = "class_init";

/// Namespace+name class lookup. The export is a thin thunk around it.
pub fn class_by_name() -> FunctionRecipe {
    FunctionRecipe::new(CLASS_BY_NAME)
        .anchor("vm_class_from_name")
        .hop(HopSelect::Single)
}

/// Type-definition-index lookup. The image-get-class export calls a helper
/// that either inlines the index lookup (zero targets, stay put) or calls
/// it first. Metadata format 29 adds one more layer of indirection at the
/// end of the helper.
pub fn class_from_typedef_index() -> FunctionRecipe {
    FunctionRecipe::new(CLASS_FROM_TYPEDEF_INDEX)
        .anchor("vm_image_get_class")
        .hop(HopSelect::Single)
        .hop(HopSelect::First)
        .alternate_when_metadata_at_least(
            MetadataVersion(29),
            vec![HopSelect::Single, HopSelect::Last, HopSelect::Single],
        )
}

/// Type-descriptor-to-class lookup behind the class-from-type export.
pub fn class_from_type() -> FunctionRecipe {
    FunctionRecipe::new(CLASS_FROM_TYPE)
        .anchor("vm_class_from_type")
        .hop(HopSelect::Single)
}

/// Static-field default-value reader, three calls deep behind the
/// static-field-get export: the getter's last callee is the internal
/// variant, whose first callee is the default-value reader.
pub fn field_default_value() -> FunctionRecipe {
    FunctionRecipe::new(FIELD_DEFAULT_VALUE)
        .anchor("vm_field_static_get_value")
        .hop(HopSelect::Single)
        .hop(HopSelect::Last)
        .hop(HopSelect::First)
}

/// Class initializer. Never reachable through an export thunk, so this one
/// is signature-first: both observed call-site shapes, oldest binaries
/// first, then the has-references export whose body begins with the same
/// initializer call.
pub fn class_init() -> FunctionRecipe {
    FunctionRecipe::new(CLASS_INIT)
        .signature(SignatureDefinition::from_hex("E8 ?? ?? ?? ?? 0F B7 47 28 83").with_xref())
        .signature(SignatureDefinition::from_hex("E8 ?? ?? ?? ?? 0F B7 47 48 48").with_xref())
        .fallback_export("vm_class_has_references")
}

pub fn stock_recipes() -> Vec<FunctionRecipe> {
    vec![
        class_by_name(),
        class_from_typedef_index(),
        class_from_type(),
        field_default_value(),
        class_init(),
    ]
}
