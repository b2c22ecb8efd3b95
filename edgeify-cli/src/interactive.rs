/// Numbered-menu editing loop over a `Session`.
///
/// Reads choices from any `BufRead` and writes prompts to any `Write`, so the
/// loop can be driven from stdin or from a test script.
use std::io::{self, BufRead, Write};
use std::path::Path;

use edgeify_core::edge_detect::EdgeOperator;
use edgeify_core::params::{Gamma, KernelSize, ParamError};
use edgeify_core::pipeline::Operation;
use edgeify_core::render::save_png;
use edgeify_core::session::Session;
use log::warn;

const MENU: &str = "
 Enter the number of the operation to apply to the current image:

 1) Enhance contrast (linear stretch to [10, 255])
 2) Apply power law (gamma) transformation
 3) Apply averaging filter for noise reduction
 4) Apply median filter for noise reduction
 5) Detect edges with the Prewitt operator
 6) Detect edges with the Sobel operator
 7) Exit
";

const GAMMA_PROMPT: &str = "Enter gamma value, 0 < gamma <= 10, default gamma = 1: ";
const SIZE_PROMPT: &str =
    "Enter filter size, odd number with 3 <= size < 10, default size = 3 (3 x 3): ";

/// Gamma typed at the prompt. Anything but a number in (0, 10] leaves the
/// image untouched.
pub fn gamma_from_prompt(input: &str) -> Result<Gamma, ParamError> {
    Gamma::parse(input)
}

/// Filter size typed at the prompt. Input that is not a non-negative integer
/// (including an empty line) means the default 3x3; an integer that is even
/// or out of range is rejected and the image is left untouched.
pub fn kernel_size_from_prompt(input: &str) -> Result<KernelSize, ParamError> {
    match input.trim().parse::<usize>() {
        Ok(n) => KernelSize::new(n),
        Err(_) => Ok(KernelSize::DEFAULT),
    }
}

fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, text: &str) -> io::Result<Option<String>> {
    write!(out, "{}", text)?;
    out.flush()?;
    read_line(input)
}

/// Drive the menu until the user picks exit or input ends.
pub fn run_menu<R: BufRead, W: Write>(
    session: &mut Session,
    mut input: R,
    mut out: W,
    preview: Option<&Path>,
) -> io::Result<()> {
    loop {
        writeln!(out, "{}", MENU)?;
        let Some(choice) = prompt(&mut input, &mut out, " Enter your choice of operation: ")? else {
            break;
        };
        let Ok(choice) = choice.parse::<u32>() else {
            continue;
        };

        let op = match choice {
            1 => Some(Operation::ContrastStretch),
            2 => {
                let Some(line) = prompt(&mut input, &mut out, GAMMA_PROMPT)? else {
                    break;
                };
                match gamma_from_prompt(&line) {
                    Ok(gamma) => Some(Operation::PowerLaw(gamma)),
                    Err(e) => {
                        writeln!(out, "Image left unchanged: {}", e)?;
                        None
                    }
                }
            }
            3 | 4 => {
                let Some(line) = prompt(&mut input, &mut out, SIZE_PROMPT)? else {
                    break;
                };
                match kernel_size_from_prompt(&line) {
                    Ok(size) if choice == 3 => Some(Operation::MeanFilter(size)),
                    Ok(size) => Some(Operation::MedianFilter(size)),
                    Err(e) => {
                        writeln!(out, "Image left unchanged: {}", e)?;
                        None
                    }
                }
            }
            5 => Some(Operation::Edges(EdgeOperator::Prewitt)),
            6 => Some(Operation::Edges(EdgeOperator::Sobel)),
            7 => break,
            _ => None,
        };

        let Some(op) = op else {
            continue;
        };

        match session.apply(op) {
            Ok(img) => {
                let (lo, hi) = img.min_max();
                writeln!(
                    out,
                    "Applied {}: {}x{}, intensities {}..={}",
                    op.describe(),
                    img.cols(),
                    img.rows(),
                    lo,
                    hi
                )?;
                if let Some(path) = preview {
                    match save_png(img, path) {
                        Ok(()) => writeln!(out, "Preview: {}", path.display())?,
                        Err(e) => warn!("failed to render preview {}: {}", path.display(), e),
                    }
                }
            }
            Err(e) => writeln!(out, "Operation failed, image unchanged: {}", e)?,
        }
    }

    writeln!(out, "Done")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use edgeify_core::buffer::ImageBuffer;
    use ndarray::array;
    use std::io::Cursor;

    fn sample_session() -> Session {
        #[rustfmt::skip]
        let img = ImageBuffer::new(array![
            [ 0,  20,  40,  60],
            [10,  90, 100,  70],
            [30, 120, 110,  80],
            [50,  60, 200, 250],
        ], 255).unwrap();
        Session::new(img)
    }

    fn run(session: &mut Session, script: &str) -> String {
        let mut out = Vec::new();
        run_menu(session, Cursor::new(script.as_bytes()), &mut out, None).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_kernel_size_prompt_policy() {
        assert_eq!(kernel_size_from_prompt("5"), Ok(KernelSize::new(5).unwrap()));
        assert_eq!(kernel_size_from_prompt(""), Ok(KernelSize::DEFAULT));
        assert_eq!(kernel_size_from_prompt("big"), Ok(KernelSize::DEFAULT));
        assert_eq!(kernel_size_from_prompt("-5"), Ok(KernelSize::DEFAULT));
        assert_eq!(
            kernel_size_from_prompt("4"),
            Err(ParamError::InvalidKernelSize(4))
        );
        assert!(kernel_size_from_prompt("11").is_err());
    }

    #[test]
    fn test_gamma_prompt_policy() {
        assert_eq!(gamma_from_prompt("0.4").unwrap().value(), 0.4);
        assert!(gamma_from_prompt("").is_err());
        assert!(gamma_from_prompt("0").is_err());
        assert!(gamma_from_prompt("12").is_err());
    }

    #[test]
    fn test_menu_applies_in_order_and_exits() {
        let mut session = sample_session();
        let output = run(&mut session, "1\n4\n\n6\n7\n");
        assert_eq!(
            session.history(),
            &[
                Operation::ContrastStretch,
                Operation::MedianFilter(KernelSize::DEFAULT),
                Operation::Edges(EdgeOperator::Sobel),
            ]
        );
        assert!(output.ends_with("Done\n"));
    }

    #[test]
    fn test_menu_ignores_junk_and_rejected_params() {
        let mut session = sample_session();
        let before = session.current().clone();
        // junk choice, unknown number, bad gamma, even filter size, then EOF
        let output = run(&mut session, "abc\n9\n2\n15\n3\n4\n");
        assert!(session.history().is_empty());
        assert_eq!(session.current(), &before);
        assert_eq!(output.matches("Image left unchanged").count(), 2);
    }

    #[test]
    fn test_menu_reports_failures() {
        let mut session = Session::new(ImageBuffer::filled(3, 3, 7, 255).unwrap());
        let output = run(&mut session, "1\n7\n");
        assert!(output.contains("Operation failed"));
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_menu_writes_preview() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preview.png");
        let mut session = sample_session();
        let mut out = Vec::new();
        run_menu(&mut session, Cursor::new(&b"5\n7\n"[..]), &mut out, Some(&path)).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_rejected_parameter_keeps_previous_preview() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preview.png");
        let mut session = sample_session();
        let mut out = Vec::new();
        // even filter size is rejected, so nothing is rendered
        run_menu(&mut session, Cursor::new(&b"3\n4\n7\n"[..]), &mut out, Some(&path)).unwrap();
        assert!(!path.exists());
    }
}
