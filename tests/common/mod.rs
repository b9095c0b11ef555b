/// Five schools encoded as Latin-1: two in "Sul" (both SP) and three in "Norte".
pub fn five_row_census() -> Vec<u8> {
    let text = "regiao;uf;municipio;co_entidade;acesso_internet_alunos_computador;\
                qt_docentes_total;alunado_total_edb;qt_mat_ensino_medio\n\
                Sul;SP;São Paulo;101;1;7;120;10\n\
                Sul;SP;Campinas;102;0;8;180;20\n\
                Norte;AM;Manaus;201;1;5;90;5\n\
                Norte;PA;Belém;202;1;6;110;15\n\
                Norte;PA;Santarém;203;0;4;70;25\n";
    text.chars().map(|c| c as u8).collect()
}
