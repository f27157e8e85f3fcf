//! Compiler and linker flags for the bridge build.

use serde::Serialize;

use crate::builder::toolchain::ToolchainInfo;

/// Flags always added to the probed C++ flags. The bridge never uses RTTI
/// and must stay debuggable.
pub const MANDATORY_CXXFLAGS: &[&str] = &["-fno-rtti", "-g"];

/// Flag linking libstdc++ statically.
pub const STATIC_LINK_FLAG: &str = "-static-libstdc++";

/// Variables exported to the native build.
pub const LLVM_LIBS: &str = "LLVM_LIBS";
pub const LLVM_CXXFLAGS: &str = "LLVM_CXXFLAGS";
pub const LLVM_LDFLAGS: &str = "LLVM_LDFLAGS";
pub const CXX_STATIC_LINK: &str = "CXX_STATIC_LINK";

/// Flags handed to the POSIX Makefiles through the child's environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildEnvironment {
    pub llvm_libs: String,
    pub llvm_cxxflags: Vec<String>,
    pub llvm_ldflags: String,
    /// `None` leaves the C++ runtime dynamically linked.
    pub cxx_static_link: Option<String>,
}

impl BuildEnvironment {
    /// The variables as `(name, value)` pairs, in a stable order.
    pub fn vars(&self) -> Vec<(&'static str, String)> {
        let mut vars = vec![
            (LLVM_LIBS, self.llvm_libs.clone()),
            (LLVM_CXXFLAGS, self.llvm_cxxflags.join(" ")),
            (LLVM_LDFLAGS, self.llvm_ldflags.clone()),
        ];
        if let Some(ref flag) = self.cxx_static_link {
            vars.push((CXX_STATIC_LINK, flag.clone()));
        }
        vars
    }
}

/// Normalize raw llvm-config output into a [`BuildEnvironment`].
pub fn assemble(
    raw_libs: &str,
    raw_cxxflags: &str,
    raw_ldflags: &str,
    static_link_requested: bool,
) -> BuildEnvironment {
    // Multi-line output from llvm-config collapses to one line.
    let llvm_libs = raw_libs.split_whitespace().collect::<Vec<_>>().join(" ");

    let llvm_cxxflags = raw_cxxflags
        .split_whitespace()
        .chain(MANDATORY_CXXFLAGS.iter().copied())
        .map(str::to_string)
        .collect();

    BuildEnvironment {
        llvm_libs,
        llvm_cxxflags,
        llvm_ldflags: raw_ldflags.trim_end().to_string(),
        cxx_static_link: static_link_requested.then(|| STATIC_LINK_FLAG.to_string()),
    }
}

/// Assemble flags from a probed toolchain.
pub fn assemble_from(info: &ToolchainInfo, static_link_requested: bool) -> BuildEnvironment {
    assemble(
        &info.libs,
        &info.cxxflags.join(" "),
        &info.ldflags,
        static_link_requested,
    )
}
