// Demo driver: generate a key pair, then round-trip a message through
// encryption/decryption and signing/verification

use std::time::Instant;

use anyhow::{bail, Context, Result};

use rsa_engine::{
    decrypt_chunks, encrypt_chunks, generate_keypair, generate_keypair_concurrent, sign_chunks,
    verify_chunks,
};

fn main() -> Result<()> {
    let mut bits: u32 = 256;
    let mut sequential = false;
    for arg in std::env::args().skip(1) {
        if arg == "--sequential" {
            sequential = true;
        } else {
            bits = arg
                .parse()
                .with_context(|| format!("invalid bit length {arg:?}"))?;
        }
    }

    println!("Generating {bits}-bit RSA key pair...");
    let started = Instant::now();
    let keypair = if sequential {
        generate_keypair(bits, &mut rand::thread_rng())?
    } else {
        generate_keypair_concurrent(bits)?
    };
    println!(
        "Generated in {:.3}s (e = {})",
        started.elapsed().as_secs_f64(),
        keypair.public_key.e
    );

    let message = b"Hello, RSA encryption and signing!";
    let public = &keypair.public_key;
    let private = &keypair.private_key;

    let ciphertexts = encrypt_chunks(message, &public.e, &public.n, keypair.bit_length)?;
    let decrypted = decrypt_chunks(&ciphertexts, &private.d, &private.n)?;
    if decrypted != message {
        bail!("decrypted message does not match the original");
    }
    println!("Encrypt/decrypt round-trip ok ({} blocks)", ciphertexts.len());

    let signature = sign_chunks(message, &private.d, &private.n, keypair.bit_length)?;
    if !verify_chunks(message, &signature, &public.e, &public.n)? {
        bail!("signature failed to verify");
    }
    println!("Sign/verify ok");

    Ok(())
}
