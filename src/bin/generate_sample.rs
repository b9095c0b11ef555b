//! Writes `sample_censo.csv`: a synthetic census export (';', Latin-1).

use anyhow::{Context, Result};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    /// Uniform integer in `0..n`.
    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.below(items.len() as u64) as usize]
    }
}

const HEADER: &[&str] = &[
    "ano_censo",
    "regiao",
    "uf",
    "municipio",
    "co_entidade",
    "dependencia",
    "categoria_escola_privada",
    "local_func_socioeducativo",
    "esola_sistema_s",
    "acesso_internet_alunos_computador",
    "qt_docentes_total",
    "alunado_total_edb",
    "qt_docentes_educacao_infantil",
    "qt_docentes_ensino_fundamental",
    "qt_docentes_ensino_medio",
    "qt_mat_educacao_infantil",
    "qt_mat_ensino_fundamental_anos_iniciais",
    "qt_mat_ensino_fundamental_anos_finais",
    "qt_mat_ensino_medio",
];

/// (region, state, municipalities)
const PLACES: &[(&str, &str, &[&str])] = &[
    ("Norte", "AM", &["Manaus", "Parintins"]),
    ("Norte", "PA", &["Belém", "Santarém"]),
    ("Nordeste", "BA", &["Salvador", "Feira de Santana"]),
    ("Nordeste", "PE", &["Recife", "Caruaru"]),
    ("Sudeste", "SP", &["São Paulo", "Campinas", "Ribeirão Preto"]),
    ("Sudeste", "MG", &["Belo Horizonte", "Uberlândia"]),
    ("Sul", "RS", &["Porto Alegre", "Caxias do Sul"]),
    ("Sul", "PR", &["Curitiba", "Londrina"]),
    ("Centro-Oeste", "GO", &["Goiânia", "Anápolis"]),
];

const DEPENDENCIES: &[&str] = &["Federal", "Estadual", "Municipal", "Privada"];
const PRIVATE_CATEGORIES: &[&str] = &[
    "Particular",
    "Comunitária",
    "Confessional",
    "Filantrópica",
];

/// Latin-1 bytes of `s`; every character must be below U+0100.
fn encode_latin1(s: &str) -> Result<Vec<u8>> {
    s.chars()
        .map(|c| u8::try_from(c).with_context(|| format!("{c:?} has no Latin-1 encoding")))
        .collect()
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let n_schools: u64 = 500;

    let output_path = "sample_censo.csv";
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_path(output_path)
        .context("creating output file")?;
    writer.write_record(HEADER).context("writing header")?;

    for id in 0..n_schools {
        let (region, uf, cities) = rng.pick(PLACES);
        let city = rng.pick(*cities);
        let dependency = rng.pick(DEPENDENCIES);
        let category = if *dependency == "Privada" {
            rng.pick(PRIVATE_CATEGORIES).to_string()
        } else {
            String::new()
        };

        let mat_infantil = rng.below(120);
        let mat_iniciais = rng.below(400);
        let mat_finais = rng.below(350);
        let mat_medio = rng.below(300);
        let doc_infantil = mat_infantil / 15 + 1;
        let doc_fundamental = (mat_iniciais + mat_finais) / 25 + 1;
        let doc_medio = mat_medio / 30 + 1;

        let fields: Vec<String> = vec![
            "2023".to_string(),
            region.to_string(),
            uf.to_string(),
            city.to_string(),
            (35_000_000 + id).to_string(),
            dependency.to_string(),
            category,
            rng.below(2).to_string(),
            rng.below(2).to_string(),
            rng.below(2).to_string(),
            (doc_infantil + doc_fundamental + doc_medio).to_string(),
            (mat_infantil + mat_iniciais + mat_finais + mat_medio).to_string(),
            doc_infantil.to_string(),
            doc_fundamental.to_string(),
            doc_medio.to_string(),
            mat_infantil.to_string(),
            mat_iniciais.to_string(),
            mat_finais.to_string(),
            mat_medio.to_string(),
        ];
        let encoded = fields
            .iter()
            .map(|f| encode_latin1(f))
            .collect::<Result<Vec<_>>>()?;
        writer
            .write_record(&encoded)
            .with_context(|| format!("writing row {id}"))?;
    }
    writer.flush().context("flushing output")?;

    println!("Wrote {n_schools} schools to {output_path}");
    Ok(())
}
