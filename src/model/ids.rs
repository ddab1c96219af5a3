//! Enum constants used by the plugin annotations and their descriptor ids

/// Defines an enum mirroring a Java annotation enum.
///
/// Each variant maps a Java constant name (`GENERATE_SOURCES`) to the id
/// written to the descriptor (`generate-sources`). The `NONE` constant of the
/// Java enums has no id and is modelled as an absent value by callers.
macro_rules! define_constant_enum {
    (
        $(#[$enum_meta:meta])*
        $enum_name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $id:literal : $constant:literal
            ),* $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $enum_name {
            $(
                $(#[$variant_meta])*
                $variant,
            )*
            Custom(String),
        }

        impl serde::Serialize for $enum_name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(self.id())
            }
        }

        impl $enum_name {
            pub fn id(&self) -> &str {
                match self {
                    $(
                        Self::$variant => $id,
                    )*
                    Self::Custom(id) => id,
                }
            }

            /// Looks up a Java constant name; `None` for unknown constants
            pub fn from_constant(constant: &str) -> Option<Self> {
                match constant {
                    $(
                        $constant => Some(Self::$variant),
                    )*
                    _ => None,
                }
            }

            /// Looks up a descriptor id, keeping unknown ids as `Custom`
            pub fn from_id(id: &str) -> Self {
                match id {
                    $(
                        $id => Self::$variant,
                    )*
                    _ => Self::Custom(id.to_string()),
                }
            }

            pub fn all_variants() -> &'static [Self] {
                &[
                    $(
                        Self::$variant,
                    )*
                ]
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.id())
            }
        }
    };
}

/// Java constant name used by every annotation enum for "not set"
pub const NONE_CONSTANT: &str = "NONE";

define_constant_enum! {
    /// Build lifecycle phases
    LifecyclePhase {
        Validate => "validate" : "VALIDATE",
        Initialize => "initialize" : "INITIALIZE",
        GenerateSources => "generate-sources" : "GENERATE_SOURCES",
        ProcessSources => "process-sources" : "PROCESS_SOURCES",
        GenerateResources => "generate-resources" : "GENERATE_RESOURCES",
        ProcessResources => "process-resources" : "PROCESS_RESOURCES",
        Compile => "compile" : "COMPILE",
        ProcessClasses => "process-classes" : "PROCESS_CLASSES",
        GenerateTestSources => "generate-test-sources" : "GENERATE_TEST_SOURCES",
        ProcessTestSources => "process-test-sources" : "PROCESS_TEST_SOURCES",
        GenerateTestResources => "generate-test-resources" : "GENERATE_TEST_RESOURCES",
        ProcessTestResources => "process-test-resources" : "PROCESS_TEST_RESOURCES",
        TestCompile => "test-compile" : "TEST_COMPILE",
        ProcessTestClasses => "process-test-classes" : "PROCESS_TEST_CLASSES",
        Test => "test" : "TEST",
        PreparePackage => "prepare-package" : "PREPARE_PACKAGE",
        Package => "package" : "PACKAGE",
        PreIntegrationTest => "pre-integration-test" : "PRE_INTEGRATION_TEST",
        IntegrationTest => "integration-test" : "INTEGRATION_TEST",
        PostIntegrationTest => "post-integration-test" : "POST_INTEGRATION_TEST",
        Verify => "verify" : "VERIFY",
        Install => "install" : "INSTALL",
        Deploy => "deploy" : "DEPLOY",
        PreClean => "pre-clean" : "PRE_CLEAN",
        Clean => "clean" : "CLEAN",
        PostClean => "post-clean" : "POST_CLEAN",
        PreSite => "pre-site" : "PRE_SITE",
        Site => "site" : "SITE",
        PostSite => "post-site" : "POST_SITE",
        SiteDeploy => "site-deploy" : "SITE_DEPLOY",
    }
}

define_constant_enum! {
    /// Dependency scopes a goal asks to have resolved or collected
    ResolutionScope {
        Compile => "compile" : "COMPILE",
        CompilePlusRuntime => "compile+runtime" : "COMPILE_PLUS_RUNTIME",
        Runtime => "runtime" : "RUNTIME",
        RuntimePlusSystem => "runtime+system" : "RUNTIME_PLUS_SYSTEM",
        Test => "test" : "TEST",
    }
}

define_constant_enum! {
    /// How the host instantiates a goal implementation
    InstantiationStrategy {
        PerLookup => "per-lookup" : "PER_LOOKUP",
        Singleton => "singleton" : "SINGLETON",
        KeepAlive => "keep-alive" : "KEEP_ALIVE",
        Poolable => "poolable" : "POOLABLE",
    }
}

impl Default for InstantiationStrategy {
    fn default() -> Self {
        InstantiationStrategy::PerLookup
    }
}
