use crate::prompter::Prompter;
use anyhow::Result;
use tracing::debug;
use wthr_core::geolocation::Geolocation;

/// Narrow geocoding candidates down to the one the user meant.
///
/// - no candidates: `None`
/// - one candidate: the user accepts it or rejects it (`None`); `retry_hint`
///   tells them what rejecting leads to
/// - several: a numbered menu; the user may back out (`None`), otherwise
///   picks a number in `1..=len`, re-prompted until it is in range
pub fn disambiguate<P>(
    prompter: &mut P,
    candidates: &[Geolocation],
    retry_hint: &str,
) -> Result<Option<Geolocation>>
where
    P: Prompter + ?Sized,
{
    debug!("Disambiguating {} candidate(s)", candidates.len());
    match candidates {
        [] => Ok(None),
        [only] => {
            println!("Location found: {only}");
            let accepted = prompter.confirm(
                &format!("Accept this location? Rejecting lets you {retry_hint}."),
                true,
            )?;
            debug!("Single candidate accepted: {accepted}");

            Ok(accepted.then(|| only.clone()))
        }
        several => {
            println!("Several locations matching your query have been found.");
            for (i, loc) in several.iter().enumerate() {
                println!("{}. {loc}", i + 1);
            }

            if !prompter.confirm("Continue with one of these locations?", true)? {
                debug!("User declined all candidates");
                return Ok(None);
            }

            let count = several.len();
            loop {
                let n = prompter.number("Please choose the number corresponding to your choice:")?;
                match usize::try_from(n) {
                    Ok(n) if (1..=count).contains(&n) => {
                        debug!("Selected candidate {n}");
                        return Ok(Some(several[n - 1].clone()));
                    }
                    _ => println!(
                        "Incorrect value chosen. Please choose number from range 1-{count}."
                    ),
                }
            }
        }
    }
}
