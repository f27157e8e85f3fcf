//! Test fixtures for common test scenarios.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use super::{CommandPattern, MockExecutor, MockProcessOutput};
use crate::builder::context::BuildContext;

/// Canned `llvm-config --system-libs --libs all` output.
pub const LLVM_LIBS_OUTPUT: &str = "-lrt -ldl -ltinfo -lpthread -lz -lm\n-lLLVMCore -lLLVMSupport\n";

/// Canned `llvm-config --cxxflags` output.
pub const LLVM_CXXFLAGS_OUTPUT: &str = "-I/usr/lib/llvm-6.0/include -std=c++11 -fPIC -DNDEBUG\n";

/// Canned `llvm-config --ldflags` output.
pub const LLVM_LDFLAGS_OUTPUT: &str = "-L/usr/lib/llvm-6.0/lib \n";

/// An llvmlite source checkout in a temporary directory:
///
/// ```text
/// <root>/ffi/Makefile.{linux,freebsd,osx}
/// <root>/ffi/dummy/CMakeLists.txt
/// <root>/llvmlite/binding/
/// ```
pub struct CheckoutFixture {
    pub root: TempDir,
    pub ctx: BuildContext,
}

impl CheckoutFixture {
    pub fn new() -> Self {
        let root = TempDir::new().expect("create temp dir");
        let ffi_dir = root.path().join("ffi");

        fs::create_dir_all(ffi_dir.join("dummy")).expect("create ffi dir");
        for tag in ["linux", "freebsd", "osx"] {
            fs::write(ffi_dir.join(format!("Makefile.{}", tag)), "all:\n").expect("write makefile");
        }
        fs::write(
            ffi_dir.join("dummy").join("CMakeLists.txt"),
            "cmake_minimum_required(VERSION 2.8)\nproject(dummy CXX)\n",
        )
        .expect("write probe project");

        let mut ctx = BuildContext::new(&ffi_dir);
        fs::create_dir_all(&ctx.target_dir).expect("create target dir");

        let scratch = root.path().join("scratch");
        fs::create_dir_all(&scratch).expect("create scratch dir");
        ctx.scratch_root = scratch;

        CheckoutFixture { root, ctx }
    }

    /// Path of a file in the FFI directory.
    pub fn ffi_path(&self, name: &str) -> PathBuf {
        self.ctx.ffi_dir.join(name)
    }

    /// Number of entries left in the generator scratch root.
    pub fn scratch_entries(&self) -> usize {
        fs::read_dir(&self.ctx.scratch_root)
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

impl Default for CheckoutFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Register llvm-config responses reporting `version` and the canned flags.
pub fn expect_llvm_config(exec: &MockExecutor, version: &str) {
    exec.expect("llvm-config --version", MockProcessOutput::success(format!("{}\n", version)));
    exec.expect(
        "llvm-config --system-libs --libs all",
        MockProcessOutput::success(LLVM_LIBS_OUTPUT),
    );
    exec.expect("llvm-config --cxxflags", MockProcessOutput::success(LLVM_CXXFLAGS_OUTPUT));
    exec.expect("llvm-config --ldflags", MockProcessOutput::success(LLVM_LDFLAGS_OUTPUT));
}

/// Register a successful `make` that writes `artifact` into its working
/// directory, as the real Makefiles do.
pub fn expect_make_producing(exec: &MockExecutor, artifact: &'static str) {
    exec.expect_with(
        CommandPattern::StartsWith("make -f Makefile.".to_string()),
        MockProcessOutput::success(""),
        move |cmd| {
            if let Some(cwd) = cmd.get_cwd() {
                fs::write(cwd.join(artifact), b"shared object").expect("write artifact");
            }
        },
    );
}
