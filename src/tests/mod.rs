// Test modules for ocr-llm crate
//
// Test organization follows the template pattern where each source file
// has a corresponding test file that focuses on business logic verification.

// Test helper utilities (scripted transport, canned vendor payloads)
pub mod helpers;


pub mod extract;
